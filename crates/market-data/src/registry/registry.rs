use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::{MarketDataError, RetryClass};
use crate::models::{FxQuote, PriceSnapshot, QuoteRequest};
use crate::provider::{FxRateProvider, MarketDataProvider};

use super::quote_cache::QuoteCache;

/// Registry of quote providers with a priority-ordered fallback chain.
///
/// For each request the registry:
/// 1. Returns a cached quote if one is still fresh
/// 2. Tries every provider that supports the asset kind, lowest priority first
/// 3. Stops on a terminal error, falls through on a provider-level one
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    fx_providers: Vec<Arc<dyn FxRateProvider>>,
    cache: QuoteCache,
}

impl ProviderRegistry {
    pub fn new(
        providers: Vec<Arc<dyn MarketDataProvider>>,
        fx_providers: Vec<Arc<dyn FxRateProvider>>,
        cache_ttl: Duration,
    ) -> Self {
        let mut providers = providers;
        providers.sort_by_key(|p| p.priority());
        let mut fx_providers = fx_providers;
        fx_providers.sort_by_key(|p| p.priority());
        Self {
            providers,
            fx_providers,
            cache: QuoteCache::new(cache_ttl),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    pub fn set_cache_ttl(&self, ttl: Duration) {
        self.cache.set_ttl(ttl);
    }

    pub async fn latest_quote(
        &self,
        request: &QuoteRequest,
    ) -> Result<PriceSnapshot, MarketDataError> {
        if let Some(cached) = self.cache.get(request) {
            debug!("Quote cache hit for {}", request.symbol);
            return Ok(cached);
        }

        let providers: Vec<_> = self
            .providers
            .iter()
            .filter(|p| p.capabilities().supports(request.kind))
            .collect();

        if providers.is_empty() {
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut last_error: Option<MarketDataError> = None;

        for provider in providers {
            match provider.get_latest_quote(request).await {
                Ok(quote) => {
                    if quote.price <= rust_decimal::Decimal::ZERO {
                        warn!(
                            "Provider {} returned non-positive price {} for {}",
                            provider.id(),
                            quote.price,
                            request.symbol
                        );
                        last_error = Some(MarketDataError::ValidationFailed {
                            message: format!("non-positive price {}", quote.price),
                        });
                        continue;
                    }
                    self.cache.put(request, quote.clone());
                    return Ok(quote);
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    debug!(
                        "Provider {} failed for {}: {}, trying next",
                        provider.id(),
                        request.symbol,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MarketDataError::AllProvidersFailed))
    }

    /// Fetches a spot rate. FX rates are not cached here; the core keeps its
    /// own last-known table.
    pub async fn fx_rate(&self, from: &str, to: &str) -> Result<FxQuote, MarketDataError> {
        if self.fx_providers.is_empty() {
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut last_error: Option<MarketDataError> = None;

        for provider in &self.fx_providers {
            match provider.get_fx_rate(from, to).await {
                Ok(quote) if quote.rate > rust_decimal::Decimal::ZERO => return Ok(quote),
                Ok(quote) => {
                    last_error = Some(MarketDataError::ValidationFailed {
                        message: format!("non-positive rate {} for {}/{}", quote.rate, from, to),
                    });
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MarketDataError::AllProvidersFailed))
    }

    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }
}
