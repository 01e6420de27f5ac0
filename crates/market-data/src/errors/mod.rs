//! Error types and retry classification for the market data crate.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant maps to a [`RetryClass`] via [`retry_class`](Self::retry_class).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No provider handles this kind of asset.
    #[error("Unsupported asset type: {0}")]
    UnsupportedAssetType(String),

    /// The provider rate limited the request.
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider returned a quote that fails sanity checks.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// No FX rate is available for the pair.
    #[error("No rate for {from}/{to}")]
    RateUnavailable { from: String, to: String },

    /// No providers are registered for the request.
    #[error("No providers available")]
    NoProvidersAvailable,

    /// All providers were tried and all failed.
    #[error("All providers failed")]
    AllProvidersFailed,
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// ```
    /// use wealthdesk_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "MANUAL".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::SymbolNotFound(_)
            | Self::UnsupportedAssetType(_)
            | Self::ValidationFailed { .. } => RetryClass::Never,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::RateUnavailable { .. } => RetryClass::NextProvider,

            Self::NoProvidersAvailable | Self::AllProvidersFailed => RetryClass::Never,
        }
    }
}
