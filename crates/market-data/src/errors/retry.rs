/// Classification for retry policy.
///
/// Used by the registry to decide whether a failed provider call should end
/// the lookup or fall through to the next provider.
///
/// | Class | Try Next Provider? |
/// |-------|-------------------|
/// | `Never` | No |
/// | `NextProvider` | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, validation error, or terminal failure.
    Never,

    /// This provider could not answer but another one might.
    NextProvider,
}
