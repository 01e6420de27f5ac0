use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Exposure;
use crate::constants::ONE_HUNDRED;
use crate::positions::AssetClass;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquiditySplit {
    pub liquid: Decimal,
    pub illiquid: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityAnalysis {
    pub liquid_value: Decimal,
    pub illiquid_value: Decimal,
    pub liquid_pct: Decimal,
    pub illiquid_pct: Decimal,
    pub by_asset_class: BTreeMap<AssetClass, LiquiditySplit>,
}

/// Splits value into liquid and illiquid buckets. An empty portfolio is 0%/0%.
pub fn liquidity_analysis(exposures: &[Exposure]) -> LiquidityAnalysis {
    let mut analysis = LiquidityAnalysis::default();
    for exposure in exposures {
        let split = analysis
            .by_asset_class
            .entry(exposure.asset_class)
            .or_default();
        if exposure.is_liquid {
            analysis.liquid_value += exposure.value;
            split.liquid += exposure.value;
        } else {
            analysis.illiquid_value += exposure.value;
            split.illiquid += exposure.value;
        }
    }

    let total = analysis.liquid_value + analysis.illiquid_value;
    if !total.is_zero() {
        analysis.liquid_pct = analysis.liquid_value / total * ONE_HUNDRED;
        analysis.illiquid_pct = analysis.illiquid_value / total * ONE_HUNDRED;
    }
    analysis
}
