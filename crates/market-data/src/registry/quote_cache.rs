use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::models::{PriceSnapshot, QuoteRequest};

/// Quotes older than this are refetched.
pub const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(900);

/// In-memory TTL cache of latest quotes, keyed by kind and symbol.
pub struct QuoteCache {
    ttl: RwLock<Duration>,
    entries: RwLock<HashMap<String, (Instant, PriceSnapshot)>>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: RwLock::new(ttl),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        *self.ttl.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Changes the TTL for every lookup from now on, including entries
    /// already stored.
    pub fn set_ttl(&self, ttl: Duration) {
        *self.ttl.write().unwrap_or_else(|e| e.into_inner()) = ttl;
    }

    /// Returns the cached quote if it is younger than the TTL.
    pub fn get(&self, request: &QuoteRequest) -> Option<PriceSnapshot> {
        let ttl = self.ttl();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&request.cache_key())
            .filter(|(stored_at, _)| stored_at.elapsed() < ttl)
            .map(|(_, quote)| quote.clone())
    }

    pub fn put(&self, request: &QuoteRequest, quote: PriceSnapshot) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(request.cache_key(), (Instant::now(), quote));
    }

    pub fn invalidate(&self, request: &QuoteRequest) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&request.cache_key());
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cache_hit_within_ttl() {
        let cache = QuoteCache::default();
        let request = QuoteRequest::new("AAPL", AssetKind::Equity);
        cache.put(&request, PriceSnapshot::new("AAPL", dec!(190), "USD", "TEST"));

        let hit = cache.get(&QuoteRequest::new("aapl", AssetKind::Equity));
        assert_eq!(hit.map(|q| q.price), Some(dec!(190)));
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = QuoteCache::new(Duration::ZERO);
        let request = QuoteRequest::new("AAPL", AssetKind::Equity);
        cache.put(&request, PriceSnapshot::new("AAPL", dec!(190), "USD", "TEST"));

        assert!(cache.get(&request).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_shortened_ttl_expires_stored_quotes() {
        let cache = QuoteCache::default();
        let request = QuoteRequest::new("AAPL", AssetKind::Equity);
        cache.put(&request, PriceSnapshot::new("AAPL", dec!(190), "USD", "TEST"));
        assert!(cache.get(&request).is_some());

        cache.set_ttl(Duration::ZERO);
        assert_eq!(cache.ttl(), Duration::ZERO);
        assert!(cache.get(&request).is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = QuoteCache::default();
        let a = QuoteRequest::new("AAPL", AssetKind::Equity);
        let b = QuoteRequest::new("BTC", AssetKind::Crypto);
        cache.put(&a, PriceSnapshot::new("AAPL", dec!(190), "USD", "TEST"));
        cache.put(&b, PriceSnapshot::new("BTC", dec!(65000), "USD", "TEST"));

        cache.invalidate(&a);
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
