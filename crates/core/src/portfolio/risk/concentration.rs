use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::Exposure;
use crate::constants::ONE_HUNDRED;
use crate::positions::AssetClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentratedHolding {
    pub name: String,
    pub value: Decimal,
    pub weight: Decimal,
    pub asset_class: AssetClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationAnalysis {
    pub hhi: Decimal,
    pub concentrated_holdings: Vec<ConcentratedHolding>,
    pub is_concentrated: bool,
    pub threshold_pct: Decimal,
}

/// Herfindahl-Hirschman index over holding values, on the 0..=10000 scale.
pub fn herfindahl_index(values: &[Decimal]) -> Decimal {
    let total: Decimal = values.iter().sum();
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    values
        .iter()
        .map(|v| {
            let w = v / total;
            w * w
        })
        .sum::<Decimal>()
        * dec!(10000)
}

/// Flags every holding whose weight is at or above `threshold_pct`.
///
/// The portfolio is concentrated when the HHI exceeds `hhi_threshold` or at
/// least one holding is flagged.
pub fn concentration_risk(
    exposures: &[Exposure],
    threshold_pct: Decimal,
    hhi_threshold: Decimal,
) -> ConcentrationAnalysis {
    let total: Decimal = exposures.iter().map(|e| e.value).sum();
    if total <= Decimal::ZERO {
        return ConcentrationAnalysis {
            hhi: Decimal::ZERO,
            concentrated_holdings: Vec::new(),
            is_concentrated: false,
            threshold_pct,
        };
    }

    let values: Vec<Decimal> = exposures.iter().map(|e| e.value).collect();
    let hhi = herfindahl_index(&values);
    let concentrated_holdings: Vec<ConcentratedHolding> = exposures
        .iter()
        .filter_map(|e| {
            let weight = e.value / total * ONE_HUNDRED;
            (weight >= threshold_pct).then(|| ConcentratedHolding {
                name: e.name.clone(),
                value: e.value,
                weight,
                asset_class: e.asset_class,
            })
        })
        .collect();

    ConcentrationAnalysis {
        is_concentrated: hhi > hhi_threshold || !concentrated_holdings.is_empty(),
        hhi,
        concentrated_holdings,
        threshold_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_CONCENTRATION_THRESHOLD_PCT, HHI_CONCENTRATION_THRESHOLD};
    use proptest::prelude::*;

    fn exposure(name: &str, value: Decimal) -> Exposure {
        Exposure {
            name: name.to_string(),
            value,
            asset_class: AssetClass::PublicEquities,
            is_liquid: true,
        }
    }

    #[test]
    fn test_single_holding_is_fully_concentrated() {
        let analysis = concentration_risk(
            &[exposure("Only", dec!(5000))],
            DEFAULT_CONCENTRATION_THRESHOLD_PCT,
            HHI_CONCENTRATION_THRESHOLD,
        );
        assert_eq!(analysis.hhi, dec!(10000));
        assert!(analysis.is_concentrated);
        assert_eq!(analysis.concentrated_holdings[0].weight, dec!(100));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // Five equal holdings sit exactly at 20%.
        let exposures: Vec<Exposure> = (0..5)
            .map(|i| exposure(&format!("H{}", i), dec!(100)))
            .collect();
        let analysis = concentration_risk(&exposures, dec!(20), HHI_CONCENTRATION_THRESHOLD);
        assert_eq!(analysis.concentrated_holdings.len(), 5);
        assert_eq!(analysis.hhi, dec!(2000));
        assert!(analysis.is_concentrated);
    }

    #[test]
    fn test_diversified_portfolio() {
        let exposures: Vec<Exposure> = (0..10)
            .map(|i| exposure(&format!("H{}", i), dec!(100)))
            .collect();
        let analysis = concentration_risk(
            &exposures,
            DEFAULT_CONCENTRATION_THRESHOLD_PCT,
            HHI_CONCENTRATION_THRESHOLD,
        );
        assert_eq!(analysis.hhi, dec!(1000));
        assert!(analysis.concentrated_holdings.is_empty());
        assert!(!analysis.is_concentrated);
    }

    #[test]
    fn test_empty_portfolio() {
        let analysis = concentration_risk(&[], dec!(20), dec!(2500));
        assert_eq!(analysis.hhi, Decimal::ZERO);
        assert!(!analysis.is_concentrated);
    }

    proptest! {
        #[test]
        fn prop_hhi_bounded_and_order_invariant(
            raw in prop::collection::vec(1u32..1_000_000, 1..20)
        ) {
            let values: Vec<Decimal> = raw.iter().map(|v| Decimal::from(*v)).collect();
            let hhi = herfindahl_index(&values);
            prop_assert!(hhi >= Decimal::ZERO);
            prop_assert!(hhi <= dec!(10000.0001));

            let mut reversed = values.clone();
            reversed.reverse();
            let diff = (herfindahl_index(&reversed) - hhi).abs();
            prop_assert!(diff < dec!(0.0001));
        }
    }
}
