//! Allocation models: targets, per-class drift and rebalancing suggestions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::ONE_HUNDRED;
use crate::errors::ValidationError;
use crate::positions::AssetClass;

/// Target weight per asset class, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetAllocation(pub BTreeMap<AssetClass, Decimal>);

impl TargetAllocation {
    pub fn new(targets: BTreeMap<AssetClass, Decimal>) -> Result<Self, ValidationError> {
        let allocation = Self(targets);
        allocation.validate()?;
        Ok(allocation)
    }

    /// Each target must be within [0, 100] and the targets may not sum past 100.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (class, target) in &self.0 {
            if *target < Decimal::ZERO || *target > ONE_HUNDRED {
                return Err(ValidationError::OutOfRange {
                    field: format!("target for {}", class),
                    value: *target,
                    min: Decimal::ZERO,
                    max: ONE_HUNDRED,
                });
            }
        }
        let total = self.total();
        if total > ONE_HUNDRED {
            return Err(ValidationError::InvalidInput(format!(
                "Target allocation sums to {}%, more than 100%",
                total
            )));
        }
        Ok(())
    }

    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    pub fn target_for(&self, asset_class: AssetClass) -> Decimal {
        self.0.get(&asset_class).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationComparison {
    pub asset_class: AssetClass,
    pub current_pct: Decimal,
    pub target_pct: Decimal,
    /// `current_pct - target_pct`. Positive means overweight.
    pub drift_pct: Decimal,
    pub current_value: Decimal,
    pub target_value: Decimal,
    /// `target_value - current_value`. Positive means money should go in.
    pub delta_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebalanceAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RebalancePriority {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingSuggestion {
    pub asset_class: AssetClass,
    pub action: RebalanceAction,
    pub priority: RebalancePriority,
    /// Amount to buy or sell in the reporting currency, always positive.
    pub amount: Decimal,
    pub current_pct: Decimal,
    pub target_pct: Decimal,
    pub drift_pct: Decimal,
}
