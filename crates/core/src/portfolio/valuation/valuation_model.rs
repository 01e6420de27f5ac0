//! Position valuation domain models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationMethod {
    Manual,
    Appraisal,
    FundStatement,
    MarketComparable,
    Model,
}

impl ValuationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMethod::Manual => "MANUAL",
            ValuationMethod::Appraisal => "APPRAISAL",
            ValuationMethod::FundStatement => "FUND_STATEMENT",
            ValuationMethod::MarketComparable => "MARKET_COMPARABLE",
            ValuationMethod::Model => "MODEL",
        }
    }
}

impl FromStr for ValuationMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(' ', "_").as_str() {
            "MANUAL" => Ok(ValuationMethod::Manual),
            "APPRAISAL" => Ok(ValuationMethod::Appraisal),
            "FUND_STATEMENT" | "NAV" => Ok(ValuationMethod::FundStatement),
            "MARKET_COMPARABLE" => Ok(ValuationMethod::MarketComparable),
            "MODEL" => Ok(ValuationMethod::Model),
            _ => Err(ValidationError::InvalidInput(format!(
                "Unknown valuation method '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        }
    }
}

impl FromStr for Confidence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Confidence::High),
            "MEDIUM" => Ok(Confidence::Medium),
            "LOW" => Ok(Confidence::Low),
            _ => Err(ValidationError::InvalidInput(format!(
                "Unknown confidence '{}'",
                s
            ))),
        }
    }
}

/// A manual mark (NAV, appraisal, statement) for a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub id: String,
    pub position_id: String,
    pub date: NaiveDate,
    pub value_per_unit: Decimal,
    pub total_value: Decimal,
    pub method: ValuationMethod,
    pub confidence: Confidence,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewValuation {
    pub position_id: String,
    pub date: NaiveDate,
    pub total_value: Decimal,
    /// Filled in by the service from the position quantity.
    #[serde(default)]
    pub value_per_unit: Decimal,
    pub method: ValuationMethod,
    pub confidence: Confidence,
    pub notes: Option<String>,
}

/// Where a position's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationSource {
    LiveQuote,
    LastNav,
    LastPrice,
    CostBasis,
}

/// A quote already converted into the position's currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotedPrice {
    pub price: Decimal,
    pub as_of: DateTime<Utc>,
}

/// Output of the valuation rules for one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub current_price: Option<Decimal>,
    pub current_value: Decimal,
    pub source: ValuationSource,
    pub priced_at: Option<DateTime<Utc>>,
}

/// Outcome of a batch price refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefreshSummary {
    pub updated: usize,
    pub total: usize,
    pub errors: Vec<String>,
}
