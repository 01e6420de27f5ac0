use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::scenario_model::{ClassImpact, HoldingImpact, Scenario, ScenarioResult};
use crate::constants::ONE_HUNDRED;
use crate::portfolio::holdings::PortfolioSnapshot;

/// Applies `scenario` to every holding of `snapshot`.
///
/// `impact = value * shock / 100`, summed per asset class and overall.
pub fn apply_scenario(snapshot: &PortfolioSnapshot, scenario: &Scenario) -> ScenarioResult {
    let mut by_asset_class: BTreeMap<_, ClassImpact> = BTreeMap::new();
    let mut most_affected: Vec<HoldingImpact> = snapshot
        .holdings
        .iter()
        .map(|holding| {
            let shock_pct = scenario.shock_for(holding.asset_class);
            let impact = holding.value * shock_pct / ONE_HUNDRED;

            let class = by_asset_class.entry(holding.asset_class).or_default();
            class.current_value += holding.value;
            class.shock_pct = shock_pct;
            class.impact += impact;

            HoldingImpact {
                position_id: holding.position_id.clone(),
                name: holding.name.clone(),
                asset_class: holding.asset_class,
                current_value: holding.value,
                shock_pct,
                impact,
            }
        })
        .collect();
    most_affected.sort_by(|a, b| b.impact.abs().cmp(&a.impact.abs()));

    for class in by_asset_class.values_mut() {
        class.new_value = class.current_value + class.impact;
    }

    let current_total = snapshot.summary.total_value;
    let total_impact: Decimal = by_asset_class.values().map(|c| c.impact).sum();
    let impact_pct = if current_total.is_zero() {
        Decimal::ZERO
    } else {
        total_impact / current_total * ONE_HUNDRED
    };
    debug!(
        "Scenario {}: impact {} ({}%)",
        scenario.id,
        total_impact,
        impact_pct.round_dp(1)
    );

    ScenarioResult {
        scenario_id: scenario.id.clone(),
        scenario_name: scenario.name.clone(),
        current_total,
        total_impact,
        new_total: current_total + total_impact,
        impact_pct,
        value_at_risk: if total_impact < Decimal::ZERO {
            -total_impact
        } else {
            Decimal::ZERO
        },
        by_asset_class,
        most_affected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{CurrencyNormalizer, RateTable};
    use crate::portfolio::holdings::{build_overview, OverviewOptions};
    use crate::portfolio::scenarios::{preset, preset_scenarios};
    use crate::positions::AssetClass;
    use crate::test_support::position;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn snapshot() -> PortfolioSnapshot {
        let positions = vec![
            position("Index ETF", "e1", AssetClass::PublicEquities, "CAD", dec!(100), dec!(40000), dec!(60000)),
            position("Rental", "e1", AssetClass::RealEstate, "CAD", dec!(1), dec!(300000), dec!(300000)),
            position("Bullion", "e1", AssetClass::Gold, "CAD", dec!(10), dec!(20000), dec!(40000)),
        ];
        let normalizer = CurrencyNormalizer::new(Arc::new(RateTable::default()), Decimal::ONE);
        build_overview(&positions, &normalizer, &OverviewOptions::default())
    }

    #[test]
    fn test_market_crash_impacts() {
        let result = apply_scenario(&snapshot(), &preset("market_crash").unwrap());

        // -18000 equities, -30000 real estate, +2000 gold
        assert_eq!(result.total_impact, dec!(-46000));
        assert_eq!(result.new_total, dec!(354000));
        assert_eq!(result.impact_pct, dec!(-11.5));
        assert_eq!(result.value_at_risk, dec!(46000));
        assert_eq!(
            result.by_asset_class[&AssetClass::RealEstate].new_value,
            dec!(270000)
        );

        let names: Vec<&str> = result.most_affected.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Rental", "Index ETF", "Bullion"]);
    }

    #[test]
    fn test_gain_scenario_has_no_value_at_risk() {
        let result = apply_scenario(&snapshot(), &preset("cad_depreciation").unwrap());
        assert_eq!(result.total_impact, dec!(12000));
        assert_eq!(result.value_at_risk, Decimal::ZERO);
    }

    #[test]
    fn test_unlisted_class_is_unshocked() {
        let mut shocks = BTreeMap::new();
        shocks.insert(AssetClass::Gold, dec!(-50));
        let scenario = Scenario::custom("Gold slump", shocks).unwrap();

        let result = apply_scenario(&snapshot(), &scenario);
        assert_eq!(result.total_impact, dec!(-20000));
        assert_eq!(
            result.by_asset_class[&AssetClass::PublicEquities].impact,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_custom_shock_bounds() {
        let mut shocks = BTreeMap::new();
        shocks.insert(AssetClass::Crypto, dec!(-150));
        assert!(Scenario::custom("Wipeout", shocks).is_err());
        assert!(Scenario::custom(" ", BTreeMap::new()).is_err());
    }

    #[test]
    fn test_presets() {
        let presets = preset_scenarios();
        assert_eq!(presets.len(), 7);
        assert!(presets.iter().all(|s| s.shocks.len() == 9));
        assert!(preset("alien_invasion").is_none());
    }

    #[test]
    fn test_empty_portfolio() {
        let normalizer = CurrencyNormalizer::new(Arc::new(RateTable::default()), Decimal::ONE);
        let empty = build_overview(&[], &normalizer, &OverviewOptions::default());
        let result = apply_scenario(&empty, &preset("recession").unwrap());
        assert_eq!(result.impact_pct, Decimal::ZERO);
        assert!(result.most_affected.is_empty());
    }
}
