//! Manual provider.
//!
//! Serves prices and FX rates that were entered by hand (or pushed by an
//! external job) from an in-memory map.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{AssetKind, FxQuote, PriceSnapshot, QuoteRequest};
use crate::provider::{FxRateProvider, MarketDataProvider, ProviderCapabilities};

const PROVIDER_ID: &str = "MANUAL";

#[derive(Default)]
pub struct ManualProvider {
    prices: RwLock<HashMap<String, PriceSnapshot>>,
    rates: RwLock<HashMap<(String, String), Decimal>>,
    priority: u8,
}

impl ManualProvider {
    pub fn new() -> Self {
        Self {
            priority: 50,
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn set_price(&self, symbol: &str, price: Decimal, currency: &str) {
        let snapshot = PriceSnapshot::new(symbol, price, currency, PROVIDER_ID);
        self.prices
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(symbol.to_uppercase(), snapshot);
    }

    pub fn remove_price(&self, symbol: &str) {
        self.prices
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&symbol.to_uppercase());
    }

    pub fn set_rate(&self, from: &str, to: &str, rate: Decimal) {
        self.rates
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((from.to_uppercase(), to.to_uppercase()), rate);
    }
}

#[async_trait]
impl MarketDataProvider for ManualProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            asset_kinds: AssetKind::ALL,
        }
    }

    async fn get_latest_quote(
        &self,
        request: &QuoteRequest,
    ) -> Result<PriceSnapshot, MarketDataError> {
        self.prices
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&request.symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(request.symbol.clone()))
    }
}

#[async_trait]
impl FxRateProvider for ManualProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    async fn get_fx_rate(&self, from: &str, to: &str) -> Result<FxQuote, MarketDataError> {
        let key = (from.to_uppercase(), to.to_uppercase());
        let rates = self.rates.read().unwrap_or_else(|e| e.into_inner());
        let rate = match rates.get(&key) {
            Some(rate) => *rate,
            None => match rates.get(&(key.1.clone(), key.0.clone())) {
                Some(inverse) if !inverse.is_zero() => Decimal::ONE / *inverse,
                _ => {
                    return Err(MarketDataError::RateUnavailable {
                        from: from.to_string(),
                        to: to.to_string(),
                    })
                }
            },
        };
        Ok(FxQuote {
            from: key.0,
            to: key.1,
            rate,
            timestamp: Utc::now(),
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_manual_price_lookup_is_case_insensitive() {
        let provider = ManualProvider::new();
        provider.set_price("btc", dec!(65000), "USD");

        let quote = provider
            .get_latest_quote(&QuoteRequest::new("BTC", AssetKind::Crypto))
            .await
            .unwrap();
        assert_eq!(quote.price, dec!(65000));
        assert_eq!(quote.source, "MANUAL");
    }

    #[tokio::test]
    async fn test_manual_missing_symbol() {
        let provider = ManualProvider::new();
        let err = provider
            .get_latest_quote(&QuoteRequest::new("NOPE", AssetKind::Equity))
            .await
            .unwrap_err();
        assert_eq!(err, MarketDataError::SymbolNotFound("NOPE".to_string()));
    }

    #[tokio::test]
    async fn test_manual_fx_uses_inverse() {
        let provider = ManualProvider::new();
        provider.set_rate("USD", "CAD", dec!(1.25));

        let quote = provider.get_fx_rate("CAD", "USD").await.unwrap();
        assert_eq!(quote.rate, dec!(0.8));
    }
}
