use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::ONE_HUNDRED;
use crate::positions::AssetClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingReturn {
    pub name: String,
    pub asset_class: AssetClass,
    /// Portfolio weight in percent.
    pub weight: Decimal,
    /// Holding return in percent.
    pub return_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingContribution {
    pub name: String,
    pub asset_class: AssetClass,
    pub weight: Decimal,
    pub return_pct: Decimal,
    pub contribution: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassContribution {
    pub weight: Decimal,
    /// Weight-averaged return of the holdings in the class.
    pub return_pct: Decimal,
    pub contribution: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub holdings: Vec<HoldingContribution>,
    pub by_asset_class: BTreeMap<AssetClass, ClassContribution>,
    pub total_contribution: Decimal,
    pub benchmark_return: Decimal,
    /// Total contribution in excess of the benchmark.
    pub alpha: Decimal,
}

/// Splits the portfolio return into per-holding contributions
/// (`weight/100 * return`) and groups them by asset class.
pub fn performance_attribution(
    holdings: &[HoldingReturn],
    benchmark_return: Decimal,
) -> Attribution {
    let mut attribution = Attribution {
        benchmark_return,
        ..Attribution::default()
    };
    for holding in holdings {
        let contribution = holding.weight / ONE_HUNDRED * holding.return_pct;
        let class = attribution
            .by_asset_class
            .entry(holding.asset_class)
            .or_default();
        class.weight += holding.weight;
        class.contribution += contribution;
        attribution.total_contribution += contribution;
        attribution.holdings.push(HoldingContribution {
            name: holding.name.clone(),
            asset_class: holding.asset_class,
            weight: holding.weight,
            return_pct: holding.return_pct,
            contribution,
        });
    }
    for class in attribution.by_asset_class.values_mut() {
        if class.weight > Decimal::ZERO {
            class.return_pct = class.contribution * ONE_HUNDRED / class.weight;
        }
    }
    attribution.alpha = attribution.total_contribution - benchmark_return;
    attribution
        .holdings
        .sort_by(|a, b| b.contribution.abs().cmp(&a.contribution.abs()));
    attribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(name: &str, class: AssetClass, weight: Decimal, ret: Decimal) -> HoldingReturn {
        HoldingReturn {
            name: name.to_string(),
            asset_class: class,
            weight,
            return_pct: ret,
        }
    }

    #[test]
    fn test_contributions_grouped_by_class() {
        let result = performance_attribution(&[
            holding("ACME", AssetClass::PublicEquities, dec!(50), dec!(10)),
            holding("Globex", AssetClass::PublicEquities, dec!(20), dec!(-5)),
            holding("Fund I", AssetClass::Fund, dec!(30), dec!(20)),
        ], dec!(8));

        assert_eq!(result.total_contribution, dec!(10));
        let equities = &result.by_asset_class[&AssetClass::PublicEquities];
        assert_eq!(equities.weight, dec!(70));
        assert_eq!(equities.contribution, dec!(4));
        assert_eq!(equities.return_pct.round_dp(6), dec!(5.714286));
        assert_eq!(result.alpha, dec!(2));
        assert_eq!(result.by_asset_class[&AssetClass::Fund].contribution, dec!(6));
        assert_eq!(result.holdings[0].name, "Fund I");
    }

    #[test]
    fn test_empty_input() {
        let result = performance_attribution(&[], Decimal::ZERO);
        assert!(result.holdings.is_empty());
        assert_eq!(result.total_contribution, Decimal::ZERO);
    }
}
