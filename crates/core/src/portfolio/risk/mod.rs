//! Portfolio-level risk: concentration (HHI) and liquidity.

mod concentration;
mod liquidity;

pub use concentration::*;
pub use liquidity::*;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::positions::AssetClass;

/// One holding as seen by the risk routines, valued in reporting currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    pub name: String,
    pub value: Decimal,
    pub asset_class: AssetClass,
    pub is_liquid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRisk {
    pub concentration: ConcentrationAnalysis,
    pub liquidity: LiquidityAnalysis,
}

pub fn assess_risk(
    exposures: &[Exposure],
    threshold_pct: Decimal,
    hhi_threshold: Decimal,
) -> PortfolioRisk {
    PortfolioRisk {
        concentration: concentration_risk(exposures, threshold_pct, hhi_threshold),
        liquidity: liquidity_analysis(exposures),
    }
}
