use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::positions::AssetClass;

/// Return figures for one position, in the reporting currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPerformance {
    pub position_id: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub value: Decimal,
    pub cost: Decimal,
    pub gain: Decimal,
    pub simple_return_pct: Decimal,
    /// Income received (dividends, distributions, interest).
    pub income: Decimal,
    /// `None` when the IRR cannot be computed, which is not the same as 0%.
    pub irr_pct: Option<Decimal>,
    pub first_flow_date: Option<NaiveDate>,
}

/// Portfolio-wide return figures over all active positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPerformance {
    pub reporting_currency: String,
    pub as_of: NaiveDate,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_gain: Decimal,
    pub simple_return_pct: Decimal,
    pub income: Decimal,
    pub income_yield_pct: Decimal,
    pub irr_pct: Option<Decimal>,
    /// Simple return annualized over the span since the first cash flow.
    pub annualized_return_pct: Decimal,
    pub first_flow_date: Option<NaiveDate>,
    pub positions: Vec<PositionPerformance>,
}
