use super::fx_errors::FxError;
use super::fx_traits::RateLookup;
use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Converts `amount` with a single lookup call. Same currency never hits the lookup.
pub fn convert(
    amount: Decimal,
    from_currency: &str,
    to_currency: &str,
    lookup: &dyn RateLookup,
) -> Result<Decimal, FxError> {
    if from_currency.eq_ignore_ascii_case(to_currency) {
        return Ok(amount);
    }
    Ok(amount * lookup.rate(from_currency, to_currency)?)
}

/// Best-effort conversion into a reporting currency.
///
/// Resolution order: the lookup, then the last rate this normalizer saw for the
/// pair (or its inverse), then the caller's default. Conversion never fails.
pub struct CurrencyNormalizer {
    lookup: Arc<dyn RateLookup>,
    last_known: Mutex<HashMap<(String, String), Decimal>>,
    default_rate: Decimal,
    fallbacks: Mutex<BTreeSet<String>>,
}

impl CurrencyNormalizer {
    pub fn new(lookup: Arc<dyn RateLookup>, default_rate: Decimal) -> Self {
        Self {
            lookup,
            last_known: Mutex::new(HashMap::new()),
            default_rate,
            fallbacks: Mutex::new(BTreeSet::new()),
        }
    }

    /// Seeds the last-known table, e.g. from the latest stored rates.
    pub fn with_known_rates(self, rates: HashMap<(String, String), Decimal>) -> Self {
        {
            let mut known = self.last_known.lock().unwrap_or_else(|e| e.into_inner());
            for ((from, to), rate) in rates {
                known.insert((from.to_uppercase(), to.to_uppercase()), rate);
            }
        }
        self
    }

    pub fn to_reporting(&self, amount: Decimal, from_currency: &str, to_currency: &str) -> Decimal {
        amount * self.rate(from_currency, to_currency)
    }

    pub fn rate(&self, from_currency: &str, to_currency: &str) -> Decimal {
        if from_currency.eq_ignore_ascii_case(to_currency) {
            return Decimal::ONE;
        }
        let key = (from_currency.to_uppercase(), to_currency.to_uppercase());

        match self.lookup.rate(&key.0, &key.1) {
            Ok(rate) if rate > Decimal::ZERO => {
                self.last_known
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key, rate);
                return rate;
            }
            Ok(rate) => warn!("Ignoring non-positive rate {} for {}/{}", rate, key.0, key.1),
            Err(e) => warn!("Rate lookup failed for {}/{}: {}", key.0, key.1, e),
        }

        self.fallbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(format!("{}/{}", key.0, key.1));

        let known = self.last_known.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(rate) = known.get(&key) {
            return *rate;
        }
        if let Some(inverse) = known.get(&(key.1.clone(), key.0.clone())) {
            if !inverse.is_zero() {
                return Decimal::ONE / *inverse;
            }
        }
        warn!(
            "No known rate for {}/{}, using default {}",
            key.0, key.1, self.default_rate
        );
        self.default_rate
    }

    /// Pairs that could not be served by the lookup so far.
    pub fn fallback_pairs(&self) -> Vec<String> {
        self.fallbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLookup {
        rate: Option<Decimal>,
        calls: AtomicUsize,
    }

    impl RateLookup for CountingLookup {
        fn rate(&self, from: &str, to: &str) -> Result<Decimal, FxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate
                .ok_or_else(|| FxError::RateNotFound(format!("{}/{}", from, to)))
        }
    }

    fn counting(rate: Option<Decimal>) -> Arc<CountingLookup> {
        Arc::new(CountingLookup {
            rate,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_same_currency_skips_lookup() {
        let lookup = counting(Some(dec!(2)));
        let normalizer = CurrencyNormalizer::new(lookup.clone(), Decimal::ONE);

        assert_eq!(normalizer.to_reporting(dec!(100), "CAD", "cad"), dec!(100));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);

        let direct = convert(dec!(100), "USD", "USD", lookup.as_ref()).unwrap();
        assert_eq!(direct, dec!(100));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lookup_rate_applied() {
        let normalizer = CurrencyNormalizer::new(counting(Some(dec!(1.35))), Decimal::ONE);
        assert_eq!(normalizer.to_reporting(dec!(100), "USD", "CAD"), dec!(135));
        assert!(normalizer.fallback_pairs().is_empty());
    }

    #[test]
    fn test_falls_back_to_last_known_then_default() {
        let mut known = HashMap::new();
        known.insert(("USD".to_string(), "CAD".to_string()), dec!(1.25));
        let normalizer =
            CurrencyNormalizer::new(counting(None), dec!(1.0)).with_known_rates(known);

        assert_eq!(normalizer.to_reporting(dec!(100), "USD", "CAD"), dec!(125));
        assert_eq!(normalizer.to_reporting(dec!(125), "CAD", "USD"), dec!(100));
        assert_eq!(normalizer.to_reporting(dec!(100), "EUR", "CAD"), dec!(100));
        assert_eq!(
            normalizer.fallback_pairs(),
            vec!["CAD/USD".to_string(), "EUR/CAD".to_string(), "USD/CAD".to_string()]
        );
    }

    #[test]
    fn test_remembers_successful_lookups() {
        struct FlakyLookup {
            calls: AtomicUsize,
        }
        impl RateLookup for FlakyLookup {
            fn rate(&self, from: &str, to: &str) -> Result<Decimal, FxError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(dec!(1.5))
                } else {
                    Err(FxError::RateNotFound(format!("{}/{}", from, to)))
                }
            }
        }

        let normalizer = CurrencyNormalizer::new(
            Arc::new(FlakyLookup {
                calls: AtomicUsize::new(0),
            }),
            dec!(9),
        );
        assert_eq!(normalizer.rate("GBP", "CAD"), dec!(1.5));
        assert_eq!(normalizer.rate("GBP", "CAD"), dec!(1.5));
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |_: &str, _: &str| -> Result<Decimal, FxError> { Ok(dec!(0.74)) };
        assert_eq!(convert(dec!(100), "CAD", "USD", &lookup).unwrap(), dec!(74));
    }
}
