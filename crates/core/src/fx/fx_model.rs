use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fx_errors::FxError;

/// One unit of `from_currency` is worth `rate` units of `to_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub as_of: DateTime<Utc>,
    pub source: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub as_of: DateTime<Utc>,
    pub source: String,
}

impl NewExchangeRate {
    pub fn validate(&self) -> Result<(), FxError> {
        for code in [&self.from_currency, &self.to_currency] {
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(FxError::InvalidCurrencyCode(code.clone()));
            }
        }
        if self.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{}/{} rate must be positive, got {}",
                self.from_currency, self.to_currency, self.rate
            )));
        }
        Ok(())
    }
}

/// Result of fetching spot rates for a set of currency pairs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FxRefreshSummary {
    pub updated: usize,
    pub total: usize,
    pub errors: Vec<String>,
}
