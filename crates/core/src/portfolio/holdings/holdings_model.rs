use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::constants::{
    DEFAULT_CONCENTRATION_THRESHOLD_PCT, DEFAULT_REPORTING_CURRENCY, HHI_CONCENTRATION_THRESHOLD,
};
use crate::portfolio::risk::PortfolioRisk;
use crate::positions::AssetClass;

/// A position valued in the reporting currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedHolding {
    pub position_id: String,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: AssetClass,
    pub native_currency: String,
    pub quantity: Decimal,
    pub native_value: Decimal,
    pub value: Decimal,
    pub cost: Decimal,
    pub gain: Decimal,
    pub gain_pct: Decimal,
    /// Share of total portfolio value, in percent.
    pub weight: Decimal,
    pub is_liquid: bool,
    pub last_price_at: Option<DateTime<Utc>>,
}

/// Totals for one group of holdings (an entity or an asset class).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotals {
    pub label: String,
    pub value: Decimal,
    pub cost: Decimal,
    pub gain: Decimal,
    pub gain_pct: Decimal,
    pub weight: Decimal,
    pub position_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub reporting_currency: String,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_gain: Decimal,
    pub total_gain_pct: Decimal,
    pub holding_count: usize,
}

/// A point-in-time fold of positions. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub summary: PortfolioSummary,
    /// Keyed by entity id.
    pub by_entity: BTreeMap<String, GroupTotals>,
    pub by_asset_class: BTreeMap<AssetClass, GroupTotals>,
    pub holdings: Vec<ValuedHolding>,
    pub risk: PortfolioRisk,
    /// Currency pairs that were converted with a fallback rate.
    pub fx_fallbacks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewOptions {
    pub reporting_currency: String,
    pub concentration_threshold_pct: Decimal,
    pub hhi_threshold: Decimal,
    /// Labels for the entity breakdown. Missing names fall back to the id.
    pub entity_names: HashMap<String, String>,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            reporting_currency: DEFAULT_REPORTING_CURRENCY.to_string(),
            concentration_threshold_pct: DEFAULT_CONCENTRATION_THRESHOLD_PCT,
            hhi_threshold: HHI_CONCENTRATION_THRESHOLD,
            entity_names: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoldingsSort {
    #[default]
    Value,
    Gain,
    GainPct,
    Name,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsFilter {
    pub entity_id: Option<String>,
    pub asset_class: Option<AssetClass>,
    /// Case-insensitive match on name or symbol.
    pub search: Option<String>,
    #[serde(default)]
    pub sort: HoldingsSort,
}

/// One slice of the asset-allocation chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub label: String,
    pub asset_class: AssetClass,
    pub value: Decimal,
    pub weight: Decimal,
}
