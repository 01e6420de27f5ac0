use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// What kind of instrument a quote is requested for.
///
/// Providers advertise the kinds they can price; the registry skips
/// providers that cannot handle the requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetKind {
    Equity,
    Crypto,
    Metal,
    Fx,
}

impl AssetKind {
    pub const ALL: &'static [AssetKind] = &[
        AssetKind::Equity,
        AssetKind::Crypto,
        AssetKind::Metal,
        AssetKind::Fx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Equity => "EQUITY",
            AssetKind::Crypto => "CRYPTO",
            AssetKind::Metal => "METAL",
            AssetKind::Fx => "FX",
        }
    }
}
