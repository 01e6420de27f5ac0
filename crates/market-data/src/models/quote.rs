use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::AssetKind;

/// Request for the latest price of one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: String,
    pub kind: AssetKind,
    /// Currency the caller expects, if known
    pub currency_hint: Option<String>,
}

impl QuoteRequest {
    pub fn new(symbol: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            currency_hint: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency_hint = Some(currency.into());
        self
    }

    /// Key used by the quote cache.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.symbol.to_uppercase())
    }
}

/// Latest known price for a symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub symbol: String,
    pub price: Decimal,
    /// Quote currency
    pub currency: String,
    /// Change since previous close, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
    /// Source of the quote (e.g. MANUAL)
    pub source: String,
}

impl PriceSnapshot {
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            currency: currency.into(),
            change_pct: None,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

/// Spot FX rate: one unit of `from` is worth `rate` units of `to`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxQuote {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}
