use rust_decimal::Decimal;
use std::collections::BTreeSet;

use super::allocation_model::{
    AllocationComparison, RebalanceAction, RebalancePriority, RebalancingSuggestion,
    TargetAllocation,
};
use crate::constants::ONE_HUNDRED;
use crate::portfolio::holdings::PortfolioSnapshot;

/// Current weight against target, per asset class.
///
/// Covers every class that has a target or is held. A held class with no
/// target is compared against 0%.
pub fn compare_to_target(
    snapshot: &PortfolioSnapshot,
    targets: &TargetAllocation,
) -> Vec<AllocationComparison> {
    let total_value = snapshot.summary.total_value;
    let classes: BTreeSet<_> = targets
        .0
        .keys()
        .chain(snapshot.by_asset_class.keys())
        .copied()
        .collect();

    classes
        .into_iter()
        .map(|asset_class| {
            let (current_value, current_pct) = snapshot
                .by_asset_class
                .get(&asset_class)
                .map(|group| (group.value, group.weight))
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            let target_pct = targets.target_for(asset_class);
            let target_value = total_value * target_pct / ONE_HUNDRED;
            AllocationComparison {
                asset_class,
                current_pct,
                target_pct,
                drift_pct: current_pct - target_pct,
                current_value,
                target_value,
                delta_value: target_value - current_value,
            }
        })
        .collect()
}

/// Rows whose drift reaches `threshold_pct`, most urgent first.
///
/// A drift of at least twice the threshold is `High` priority.
pub fn rebalancing_suggestions(
    comparison: &[AllocationComparison],
    threshold_pct: Decimal,
) -> Vec<RebalancingSuggestion> {
    let mut suggestions: Vec<RebalancingSuggestion> = comparison
        .iter()
        .filter(|row| !row.drift_pct.is_zero() && row.drift_pct.abs() >= threshold_pct)
        .map(|row| RebalancingSuggestion {
            asset_class: row.asset_class,
            action: if row.drift_pct > Decimal::ZERO {
                RebalanceAction::Sell
            } else {
                RebalanceAction::Buy
            },
            priority: if row.drift_pct.abs() >= threshold_pct * Decimal::TWO {
                RebalancePriority::High
            } else {
                RebalancePriority::Medium
            },
            amount: row.delta_value.abs(),
            current_pct: row.current_pct,
            target_pct: row.target_pct,
            drift_pct: row.drift_pct,
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.drift_pct.abs().cmp(&a.drift_pct.abs()))
    });
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{CurrencyNormalizer, RateTable};
    use crate::portfolio::holdings::{build_overview, OverviewOptions};
    use crate::positions::AssetClass;
    use crate::test_support::position;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn snapshot() -> PortfolioSnapshot {
        let positions = vec![
            position("eq", "e1", AssetClass::PublicEquities, "CAD", dec!(1), dec!(500), dec!(700)),
            position("bd", "e1", AssetClass::Bonds, "CAD", dec!(1), dec!(200), dec!(200)),
            position("btc", "e1", AssetClass::Crypto, "CAD", dec!(1), dec!(50), dec!(100)),
        ];
        let normalizer = CurrencyNormalizer::new(Arc::new(RateTable::default()), Decimal::ONE);
        build_overview(&positions, &normalizer, &OverviewOptions::default())
    }

    fn targets() -> TargetAllocation {
        TargetAllocation::new(BTreeMap::from([
            (AssetClass::PublicEquities, dec!(60)),
            (AssetClass::Bonds, dec!(30)),
            (AssetClass::Gold, dec!(10)),
        ]))
        .unwrap()
    }

    #[test]
    fn test_compare_includes_untargeted_holdings() {
        let rows = compare_to_target(&snapshot(), &targets());
        assert_eq!(rows.len(), 4);

        let equities = rows
            .iter()
            .find(|r| r.asset_class == AssetClass::PublicEquities)
            .unwrap();
        assert_eq!(equities.current_pct, dec!(70));
        assert_eq!(equities.drift_pct, dec!(10));
        assert_eq!(equities.target_value, dec!(600));
        assert_eq!(equities.delta_value, dec!(-100));

        let crypto = rows.iter().find(|r| r.asset_class == AssetClass::Crypto).unwrap();
        assert_eq!(crypto.target_pct, Decimal::ZERO);
        assert_eq!(crypto.drift_pct, dec!(10));

        let gold = rows.iter().find(|r| r.asset_class == AssetClass::Gold).unwrap();
        assert_eq!(gold.current_value, Decimal::ZERO);
        assert_eq!(gold.delta_value, dec!(100));
    }

    #[test]
    fn test_suggestions_filter_and_priority() {
        let rows = compare_to_target(&snapshot(), &targets());
        let suggestions = rebalancing_suggestions(&rows, dec!(5));

        // equities +10, bonds -10, crypto +10, gold -10: all at twice the threshold
        assert_eq!(suggestions.len(), 4);
        assert!(suggestions.iter().all(|s| s.priority == RebalancePriority::High));

        let bonds = suggestions
            .iter()
            .find(|s| s.asset_class == AssetClass::Bonds)
            .unwrap();
        assert_eq!(bonds.action, RebalanceAction::Buy);
        assert_eq!(bonds.amount, dec!(100));

        let medium = rebalancing_suggestions(&rows, dec!(8));
        assert!(medium.iter().all(|s| s.priority == RebalancePriority::Medium));
        assert!(rebalancing_suggestions(&rows, dec!(11)).is_empty());
    }

    #[test]
    fn test_high_priority_sorted_first() {
        let rows = vec![
            AllocationComparison {
                asset_class: AssetClass::Bonds,
                current_pct: dec!(24),
                target_pct: dec!(30),
                drift_pct: dec!(-6),
                current_value: dec!(240),
                target_value: dec!(300),
                delta_value: dec!(60),
            },
            AllocationComparison {
                asset_class: AssetClass::Crypto,
                current_pct: dec!(15),
                target_pct: dec!(2),
                drift_pct: dec!(13),
                current_value: dec!(150),
                target_value: dec!(20),
                delta_value: dec!(-130),
            },
        ];
        let suggestions = rebalancing_suggestions(&rows, dec!(5));
        assert_eq!(suggestions[0].asset_class, AssetClass::Crypto);
        assert_eq!(suggestions[0].priority, RebalancePriority::High);
        assert_eq!(suggestions[0].action, RebalanceAction::Sell);
        assert_eq!(suggestions[1].priority, RebalancePriority::Medium);
    }

    #[test]
    fn test_target_validation() {
        assert!(TargetAllocation::new(BTreeMap::from([(AssetClass::Gold, dec!(101))])).is_err());
        assert!(TargetAllocation::new(BTreeMap::from([
            (AssetClass::Gold, dec!(60)),
            (AssetClass::Bonds, dec!(50)),
        ]))
        .is_err());
        assert!(TargetAllocation::new(BTreeMap::from([(AssetClass::Gold, dec!(-1))])).is_err());
    }
}
