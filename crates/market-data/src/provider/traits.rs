//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{FxQuote, PriceSnapshot, QuoteRequest};

use super::capabilities::ProviderCapabilities;

/// Trait for price quote providers.
///
/// Implement this trait to plug a new price feed into the registry.
///
/// ```ignore
/// struct KrakenProvider { client: Client }
///
/// #[async_trait]
/// impl MarketDataProvider for KrakenProvider {
///     fn id(&self) -> &'static str { "SAMPLE" }
///     fn priority(&self) -> u8 { 1 }
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities { asset_kinds: &[AssetKind::Crypto] }
///     }
///     async fn get_latest_quote(&self, request: &QuoteRequest)
///         -> Result<PriceSnapshot, MarketDataError> { ... }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "SAMPLE".
    fn id(&self) -> &'static str;

    /// Lower values are tried first. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    fn capabilities(&self) -> ProviderCapabilities;

    async fn get_latest_quote(
        &self,
        request: &QuoteRequest,
    ) -> Result<PriceSnapshot, MarketDataError>;
}

/// Trait for spot FX rate providers.
#[async_trait]
pub trait FxRateProvider: Send + Sync {
    fn id(&self) -> &'static str;

    fn priority(&self) -> u8 {
        10
    }

    async fn get_fx_rate(&self, from: &str, to: &str) -> Result<FxQuote, MarketDataError>;
}
