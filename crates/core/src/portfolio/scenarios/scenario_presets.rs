use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use super::scenario_model::Scenario;
use crate::positions::AssetClass::{self, *};

pub const PRESET_IDS: [&str; 7] = [
    "market_crash",
    "recession",
    "inflation",
    "rate_hike",
    "cad_depreciation",
    "tech_crash",
    "real_estate_correction",
];

// Column order for every preset row below.
const COLUMNS: [AssetClass; 9] = [
    PublicEquities,
    PrivateBusiness,
    VentureFund,
    VentureEntity,
    RealEstate,
    Gold,
    Crypto,
    CashEquivalents,
    Bonds,
];

fn build(id: &str, name: &str, description: &str, row: [Decimal; 9]) -> Scenario {
    Scenario {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        shocks: COLUMNS.iter().copied().zip(row).collect::<BTreeMap<_, _>>(),
    }
}

/// Looks up a built-in scenario by id.
pub fn preset(id: &str) -> Option<Scenario> {
    let scenario = match id {
        "market_crash" => build(
            id,
            "Market Crash",
            "30% decline in global equity markets over 3 months",
            [dec!(-30), dec!(-20), dec!(-25), dec!(-30), dec!(-10), dec!(5), dec!(-50), dec!(0), dec!(5)],
        ),
        "recession" => build(
            id,
            "Recession",
            "Canadian recession with GDP declining 2% over 12 months",
            [dec!(-20), dec!(-15), dec!(-20), dec!(-25), dec!(-15), dec!(10), dec!(-30), dec!(0), dec!(3)],
        ),
        "inflation" => build(
            id,
            "High Inflation",
            "Inflation rising to 8% with aggressive rate hikes",
            [dec!(-15), dec!(-5), dec!(-15), dec!(-20), dec!(5), dec!(15), dec!(-20), dec!(-5), dec!(-10)],
        ),
        "rate_hike" => build(
            id,
            "Rate Shock",
            "Bank of Canada raising rates by 200 basis points",
            [dec!(-10), dec!(-5), dec!(-10), dec!(-15), dec!(-20), dec!(0), dec!(-15), dec!(2), dec!(-8)],
        ),
        // USD-denominated holdings gain in CAD terms.
        "cad_depreciation" => build(
            id,
            "CAD Depreciation",
            "Canadian dollar declining 15% against USD",
            [dec!(10), dec!(0), dec!(5), dec!(5), dec!(0), dec!(15), dec!(15), dec!(0), dec!(0)],
        ),
        "tech_crash" => build(
            id,
            "Tech Crash",
            "Technology sector declining 40% while other sectors flat",
            [dec!(-25), dec!(-10), dec!(-40), dec!(-40), dec!(0), dec!(5), dec!(-35), dec!(0), dec!(3)],
        ),
        "real_estate_correction" => build(
            id,
            "Real Estate Correction",
            "Canadian real estate values declining 25%",
            [dec!(-5), dec!(-5), dec!(0), dec!(0), dec!(-25), dec!(3), dec!(0), dec!(0), dec!(2)],
        ),
        _ => return None,
    };
    Some(scenario)
}

pub fn preset_scenarios() -> Vec<Scenario> {
    PRESET_IDS.iter().filter_map(|id| preset(id)).collect()
}
