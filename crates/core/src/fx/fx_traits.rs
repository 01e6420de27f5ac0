use super::currency_normalizer::CurrencyNormalizer;
use super::fx_errors::FxError;
use super::fx_model::{ExchangeRate, FxRefreshSummary, NewExchangeRate};
use super::rate_table::RateTable;
use crate::errors::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Synchronous rate capability: how many `to` units one `from` unit buys.
pub trait RateLookup: Send + Sync {
    fn rate(&self, from: &str, to: &str) -> std::result::Result<Decimal, FxError>;
}

impl<F> RateLookup for F
where
    F: Fn(&str, &str) -> std::result::Result<Decimal, FxError> + Send + Sync,
{
    fn rate(&self, from: &str, to: &str) -> std::result::Result<Decimal, FxError> {
        self(from, to)
    }
}

/// Trait defining the contract for FX repository operations.
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    /// Latest stored rate for every pair.
    fn get_latest_exchange_rates(&self) -> Result<Vec<ExchangeRate>>;
    fn get_historical_exchange_rates(&self) -> Result<Vec<ExchangeRate>>;
    fn get_latest_exchange_rate(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>>;
    async fn save_exchange_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate>;
    async fn delete_exchange_rate(&self, rate_id: &str) -> Result<()>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    fn rate_table(&self) -> Result<RateTable>;
    fn normalizer(&self, default_rate: Decimal) -> Result<CurrencyNormalizer>;
    fn get_latest_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal>;
    fn convert_currency(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal>;
    async fn add_exchange_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate>;
    async fn delete_exchange_rate(&self, rate_id: &str) -> Result<()>;
    /// Fetches spot rates for the pairs and stores the ones that succeed.
    async fn refresh_rates(&self, pairs: &[(String, String)]) -> Result<FxRefreshSummary>;
}
