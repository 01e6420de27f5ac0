//! Analytics settings persisted as key/value rows.

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONCENTRATION_THRESHOLD_PCT, DEFAULT_FALLBACK_FX_RATE, DEFAULT_REBALANCE_THRESHOLD_PCT,
    DEFAULT_REFRESH_CONCURRENCY, DEFAULT_REPORTING_CURRENCY, DEFAULT_RISK_FREE_RATE_ANNUAL_PCT,
    HHI_CONCENTRATION_THRESHOLD, ONE_HUNDRED,
};
use crate::errors::ValidationError;
use crate::portfolio::performance::XirrConfig;

pub const KEY_REPORTING_CURRENCY: &str = "reporting_currency";
pub const KEY_CONCENTRATION_THRESHOLD_PCT: &str = "concentration_threshold_pct";
pub const KEY_HHI_THRESHOLD: &str = "hhi_threshold";
pub const KEY_RISK_FREE_RATE_ANNUAL_PCT: &str = "risk_free_rate_annual_pct";
pub const KEY_FALLBACK_FX_RATE: &str = "fallback_fx_rate";
pub const KEY_REFRESH_CONCURRENCY: &str = "refresh_concurrency";
pub const KEY_QUOTE_CACHE_TTL_SECS: &str = "quote_cache_ttl_secs";
pub const KEY_REBALANCE_THRESHOLD_PCT: &str = "rebalance_threshold_pct";
pub const KEY_XIRR_LOWER_BOUND: &str = "xirr_lower_bound";
pub const KEY_XIRR_UPPER_BOUND: &str = "xirr_upper_bound";
pub const KEY_XIRR_SEED: &str = "xirr_seed";
pub const KEY_XIRR_MAX_ITERATIONS: &str = "xirr_max_iterations";

pub const DEFAULT_QUOTE_CACHE_TTL_SECS: u64 = 900;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettings {
    pub reporting_currency: String,
    pub concentration_threshold_pct: Decimal,
    pub hhi_threshold: Decimal,
    pub risk_free_rate_annual_pct: Decimal,
    pub fallback_fx_rate: Decimal,
    pub refresh_concurrency: usize,
    pub quote_cache_ttl_secs: u64,
    pub rebalance_threshold_pct: Decimal,
    pub xirr: XirrConfig,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            reporting_currency: DEFAULT_REPORTING_CURRENCY.to_string(),
            concentration_threshold_pct: DEFAULT_CONCENTRATION_THRESHOLD_PCT,
            hhi_threshold: HHI_CONCENTRATION_THRESHOLD,
            risk_free_rate_annual_pct: DEFAULT_RISK_FREE_RATE_ANNUAL_PCT,
            fallback_fx_rate: DEFAULT_FALLBACK_FX_RATE,
            refresh_concurrency: DEFAULT_REFRESH_CONCURRENCY,
            quote_cache_ttl_secs: DEFAULT_QUOTE_CACHE_TTL_SECS,
            rebalance_threshold_pct: DEFAULT_REBALANCE_THRESHOLD_PCT,
            xirr: XirrConfig::default(),
        }
    }
}

impl AnalyticsSettings {
    pub fn quote_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_cache_ttl_secs)
    }
}

fn parse_or<T: FromStr>(values: &HashMap<String, String>, key: &str, default: T) -> T {
    match values.get(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable setting {}='{}'", key, raw);
                default
            }
        },
    }
}

impl AnalyticsSettings {
    /// Builds settings from stored rows. Missing or unparsable values keep
    /// their defaults and unknown keys are ignored.
    pub fn from_pairs(values: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let reporting_currency = values
            .get(KEY_REPORTING_CURRENCY)
            .map(|c| c.trim().to_uppercase())
            .filter(|c| is_currency_code(c))
            .unwrap_or(defaults.reporting_currency);

        Self {
            reporting_currency,
            concentration_threshold_pct: parse_or(
                values,
                KEY_CONCENTRATION_THRESHOLD_PCT,
                defaults.concentration_threshold_pct,
            ),
            hhi_threshold: parse_or(values, KEY_HHI_THRESHOLD, defaults.hhi_threshold),
            risk_free_rate_annual_pct: parse_or(
                values,
                KEY_RISK_FREE_RATE_ANNUAL_PCT,
                defaults.risk_free_rate_annual_pct,
            ),
            fallback_fx_rate: parse_or(values, KEY_FALLBACK_FX_RATE, defaults.fallback_fx_rate),
            refresh_concurrency: parse_or(
                values,
                KEY_REFRESH_CONCURRENCY,
                defaults.refresh_concurrency,
            )
            .max(1),
            quote_cache_ttl_secs: parse_or(
                values,
                KEY_QUOTE_CACHE_TTL_SECS,
                defaults.quote_cache_ttl_secs,
            ),
            rebalance_threshold_pct: parse_or(
                values,
                KEY_REBALANCE_THRESHOLD_PCT,
                defaults.rebalance_threshold_pct,
            ),
            xirr: XirrConfig {
                lower_bound: parse_or(values, KEY_XIRR_LOWER_BOUND, defaults.xirr.lower_bound),
                upper_bound: parse_or(values, KEY_XIRR_UPPER_BOUND, defaults.xirr.upper_bound),
                seed: parse_or(values, KEY_XIRR_SEED, defaults.xirr.seed),
                max_iterations: parse_or(
                    values,
                    KEY_XIRR_MAX_ITERATIONS,
                    defaults.xirr.max_iterations,
                ),
                tolerance: defaults.xirr.tolerance,
            },
        }
    }
}

pub(crate) fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Partial update. Only the fields that are set are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettingsUpdate {
    pub reporting_currency: Option<String>,
    pub concentration_threshold_pct: Option<Decimal>,
    pub hhi_threshold: Option<Decimal>,
    pub risk_free_rate_annual_pct: Option<Decimal>,
    pub fallback_fx_rate: Option<Decimal>,
    pub refresh_concurrency: Option<usize>,
    pub quote_cache_ttl_secs: Option<u64>,
    pub rebalance_threshold_pct: Option<Decimal>,
    pub xirr_lower_bound: Option<Decimal>,
    pub xirr_upper_bound: Option<Decimal>,
    pub xirr_seed: Option<Decimal>,
    pub xirr_max_iterations: Option<u32>,
}

fn check_pct(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: Decimal::ZERO,
            max: ONE_HUNDRED,
        });
    }
    Ok(())
}

impl AnalyticsSettingsUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(currency) = &self.reporting_currency {
            if !is_currency_code(currency.trim()) {
                return Err(ValidationError::InvalidInput(format!(
                    "'{}' is not a 3-letter currency code",
                    currency
                )));
            }
        }
        if let Some(value) = self.concentration_threshold_pct {
            check_pct(KEY_CONCENTRATION_THRESHOLD_PCT, value)?;
        }
        if let Some(value) = self.rebalance_threshold_pct {
            check_pct(KEY_REBALANCE_THRESHOLD_PCT, value)?;
        }
        if let Some(value) = self.risk_free_rate_annual_pct {
            check_pct(KEY_RISK_FREE_RATE_ANNUAL_PCT, value)?;
        }
        if let Some(value) = self.hhi_threshold {
            if value < Decimal::ZERO || value > dec!(10000) {
                return Err(ValidationError::OutOfRange {
                    field: KEY_HHI_THRESHOLD.to_string(),
                    value,
                    min: Decimal::ZERO,
                    max: dec!(10000),
                });
            }
        }
        if let Some(rate) = self.fallback_fx_rate {
            if rate <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(
                    "fallback_fx_rate must be positive".to_string(),
                ));
            }
        }
        if self.refresh_concurrency == Some(0) {
            return Err(ValidationError::InvalidInput(
                "refresh_concurrency must be at least 1".to_string(),
            ));
        }
        if self.xirr_max_iterations == Some(0) {
            return Err(ValidationError::InvalidInput(
                "xirr_max_iterations must be at least 1".to_string(),
            ));
        }
        if let Some(lower) = self.xirr_lower_bound {
            if lower <= dec!(-1) {
                return Err(ValidationError::InvalidInput(
                    "xirr_lower_bound must be greater than -1".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Key/value rows to persist.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        };
        push(
            KEY_REPORTING_CURRENCY,
            self.reporting_currency
                .as_ref()
                .map(|c| c.trim().to_uppercase()),
        );
        push(
            KEY_CONCENTRATION_THRESHOLD_PCT,
            self.concentration_threshold_pct.map(|v| v.to_string()),
        );
        push(KEY_HHI_THRESHOLD, self.hhi_threshold.map(|v| v.to_string()));
        push(
            KEY_RISK_FREE_RATE_ANNUAL_PCT,
            self.risk_free_rate_annual_pct.map(|v| v.to_string()),
        );
        push(KEY_FALLBACK_FX_RATE, self.fallback_fx_rate.map(|v| v.to_string()));
        push(
            KEY_REFRESH_CONCURRENCY,
            self.refresh_concurrency.map(|v| v.to_string()),
        );
        push(
            KEY_QUOTE_CACHE_TTL_SECS,
            self.quote_cache_ttl_secs.map(|v| v.to_string()),
        );
        push(
            KEY_REBALANCE_THRESHOLD_PCT,
            self.rebalance_threshold_pct.map(|v| v.to_string()),
        );
        push(KEY_XIRR_LOWER_BOUND, self.xirr_lower_bound.map(|v| v.to_string()));
        push(KEY_XIRR_UPPER_BOUND, self.xirr_upper_bound.map(|v| v.to_string()));
        push(KEY_XIRR_SEED, self.xirr_seed.map(|v| v.to_string()));
        push(
            KEY_XIRR_MAX_ITERATIONS,
            self.xirr_max_iterations.map(|v| v.to_string()),
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let settings = AnalyticsSettings::from_pairs(&HashMap::new());
        assert_eq!(settings, AnalyticsSettings::default());
        assert_eq!(settings.reporting_currency, "CAD");
        assert_eq!(settings.refresh_concurrency, 4);
        assert_eq!(settings.xirr.max_iterations, 1000);
    }

    #[test]
    fn test_tolerant_parsing() {
        let mut values = HashMap::new();
        values.insert(KEY_CONCENTRATION_THRESHOLD_PCT.to_string(), "15".to_string());
        values.insert(KEY_HHI_THRESHOLD.to_string(), "not-a-number".to_string());
        values.insert(KEY_REPORTING_CURRENCY.to_string(), "usd".to_string());
        values.insert("theme".to_string(), "dark".to_string());
        values.insert(KEY_REFRESH_CONCURRENCY.to_string(), "0".to_string());

        let settings = AnalyticsSettings::from_pairs(&values);
        assert_eq!(settings.concentration_threshold_pct, dec!(15));
        assert_eq!(settings.hhi_threshold, dec!(2500));
        assert_eq!(settings.reporting_currency, "USD");
        assert_eq!(settings.refresh_concurrency, 1);
    }

    #[test]
    fn test_update_validation() {
        let bad_threshold = AnalyticsSettingsUpdate {
            concentration_threshold_pct: Some(dec!(120)),
            ..Default::default()
        };
        assert!(matches!(
            bad_threshold.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));

        let bad_currency = AnalyticsSettingsUpdate {
            reporting_currency: Some("DOLLAR".to_string()),
            ..Default::default()
        };
        assert!(bad_currency.validate().is_err());

        let zero_workers = AnalyticsSettingsUpdate {
            refresh_concurrency: Some(0),
            ..Default::default()
        };
        assert!(zero_workers.validate().is_err());

        let ok = AnalyticsSettingsUpdate {
            rebalance_threshold_pct: Some(dec!(0)),
            concentration_threshold_pct: Some(dec!(100)),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_update_writes_only_set_fields() {
        let update = AnalyticsSettingsUpdate {
            reporting_currency: Some(" usd ".to_string()),
            refresh_concurrency: Some(8),
            ..Default::default()
        };
        let pairs = update.to_pairs();
        assert_eq!(
            pairs,
            vec![
                (KEY_REPORTING_CURRENCY.to_string(), "USD".to_string()),
                (KEY_REFRESH_CONCURRENCY.to_string(), "8".to_string()),
            ]
        );
    }
}
