use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ValidationError;
use crate::positions::AssetClass;

const MIN_SHOCK_PCT: Decimal = dec!(-100);
const MAX_SHOCK_PCT: Decimal = dec!(100);

/// A set of percentage shocks keyed by asset class. Classes without an
/// entry are left unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub shocks: BTreeMap<AssetClass, Decimal>,
}

impl Scenario {
    /// A user-built scenario. Shocks must lie in [-100, 100].
    pub fn custom(
        name: impl Into<String>,
        shocks: BTreeMap<AssetClass, Decimal>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        for (class, shock) in &shocks {
            if *shock < MIN_SHOCK_PCT || *shock > MAX_SHOCK_PCT {
                return Err(ValidationError::OutOfRange {
                    field: format!("shock for {}", class),
                    value: *shock,
                    min: MIN_SHOCK_PCT,
                    max: MAX_SHOCK_PCT,
                });
            }
        }
        Ok(Self {
            id: "custom".to_string(),
            name,
            description: "Custom scenario".to_string(),
            shocks,
        })
    }

    pub fn shock_for(&self, asset_class: AssetClass) -> Decimal {
        self.shocks
            .get(&asset_class)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingImpact {
    pub position_id: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub current_value: Decimal,
    pub shock_pct: Decimal,
    pub impact: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassImpact {
    pub current_value: Decimal,
    pub shock_pct: Decimal,
    pub impact: Decimal,
    pub new_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub scenario_name: String,
    pub current_total: Decimal,
    pub total_impact: Decimal,
    pub new_total: Decimal,
    /// Impact as a percentage of the current total, 0 for an empty portfolio.
    pub impact_pct: Decimal,
    /// The size of a loss, or 0 when the scenario is a net gain.
    pub value_at_risk: Decimal,
    pub by_asset_class: BTreeMap<AssetClass, ClassImpact>,
    /// Holdings sorted by absolute impact, largest first.
    pub most_affected: Vec<HoldingImpact>,
}
