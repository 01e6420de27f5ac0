use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::fx::{CurrencyNormalizer, FxError};
use crate::positions::{AssetClass, PositionStatus};
use crate::test_support::position;

fn normalizer() -> CurrencyNormalizer {
    let lookup = |from: &str, to: &str| -> Result<Decimal, FxError> {
        match (from, to) {
            ("USD", "CAD") => Ok(dec!(1.25)),
            _ => Err(FxError::RateNotFound(format!("{}/{}", from, to))),
        }
    };
    CurrencyNormalizer::new(Arc::new(lookup), Decimal::ONE)
}

fn options() -> OverviewOptions {
    let mut entity_names = HashMap::new();
    entity_names.insert("opco".to_string(), "Operating Co".to_string());
    OverviewOptions {
        entity_names,
        ..OverviewOptions::default()
    }
}

#[test]
fn test_overview_normalizes_and_groups() {
    let positions = vec![
        position("equity", "opco", AssetClass::PublicEquities, "USD", dec!(10), dec!(800), dec!(1200)),
        position("fund", "holdco", AssetClass::Fund, "CAD", dec!(1), dec!(1000), dec!(1500)),
    ];
    let snapshot = build_overview(&positions, &normalizer(), &options());

    // 1200 USD -> 1500 CAD, 800 USD -> 1000 CAD
    assert_eq!(snapshot.summary.total_value, dec!(3000));
    assert_eq!(snapshot.summary.total_cost, dec!(2000));
    assert_eq!(snapshot.summary.total_gain, dec!(1000));
    assert_eq!(snapshot.summary.total_gain_pct, dec!(50));
    assert_eq!(snapshot.summary.holding_count, 2);

    let opco = &snapshot.by_entity["opco"];
    assert_eq!(opco.label, "Operating Co");
    assert_eq!(opco.value, dec!(1500));
    assert_eq!(opco.weight, dec!(50));
    assert_eq!(opco.position_ids, vec!["equity".to_string()]);
    assert_eq!(snapshot.by_entity["holdco"].label, "holdco");

    let funds = &snapshot.by_asset_class[&AssetClass::Fund];
    assert_eq!(funds.label, "Fund");
    assert_eq!(funds.gain, dec!(500));
    assert_eq!(funds.gain_pct, dec!(50));

    let equity = snapshot.holdings.iter().find(|h| h.position_id == "equity").unwrap();
    assert_eq!(equity.native_value, dec!(1200));
    assert_eq!(equity.value, dec!(1500));
    assert_eq!(equity.weight, dec!(50));
    assert!(snapshot.fx_fallbacks.is_empty());

    assert_eq!(snapshot.risk.liquidity.liquid_pct, dec!(50));
    assert_eq!(snapshot.risk.concentration.hhi, dec!(5000));
    assert!(snapshot.risk.concentration.is_concentrated);
}

#[test]
fn test_exited_positions_are_ignored() {
    let mut exited = position("gone", "e1", AssetClass::Crypto, "CAD", dec!(1), dec!(10), dec!(99));
    exited.status = PositionStatus::Exited;
    let kept = position("kept", "e1", AssetClass::Crypto, "CAD", dec!(1), dec!(10), dec!(20));

    let snapshot = build_overview(&[exited, kept], &normalizer(), &options());
    assert_eq!(snapshot.summary.holding_count, 1);
    assert_eq!(snapshot.summary.total_value, dec!(20));
}

#[test]
fn test_zero_total_gives_zero_weights() {
    let positions = vec![
        position("a", "e1", AssetClass::Other, "CAD", Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        position("b", "e1", AssetClass::Other, "CAD", Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
    ];
    let snapshot = build_overview(&positions, &normalizer(), &options());
    assert!(snapshot.holdings.iter().all(|h| h.weight.is_zero()));
    assert_eq!(snapshot.summary.total_gain_pct, Decimal::ZERO);
    assert!(!snapshot.risk.concentration.is_concentrated);
}

#[test]
fn test_missing_rate_is_reported_as_fallback() {
    let positions = vec![position("eu", "e1", AssetClass::Bonds, "EUR", dec!(1), dec!(100), dec!(100))];
    let snapshot = build_overview(&positions, &normalizer(), &options());
    assert_eq!(snapshot.summary.total_value, dec!(100));
    assert_eq!(snapshot.fx_fallbacks, vec!["EUR/CAD".to_string()]);
}

#[test]
fn test_filter_and_sort() {
    let mut a = position("Alpha", "e1", AssetClass::PublicEquities, "CAD", dec!(1), dec!(100), dec!(300));
    a.symbol = Some("ALP".to_string());
    let b = position("Beta", "e2", AssetClass::PublicEquities, "CAD", dec!(1), dec!(100), dec!(150));
    let c = position("Gamma", "e1", AssetClass::RealEstate, "CAD", dec!(1), dec!(500), dec!(400));
    let snapshot = build_overview(&[a, b, c], &normalizer(), &options());

    let by_value = filter_holdings(&snapshot, &HoldingsFilter::default());
    let names: Vec<&str> = by_value.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);

    let by_gain_pct = filter_holdings(
        &snapshot,
        &HoldingsFilter {
            sort: HoldingsSort::GainPct,
            ..Default::default()
        },
    );
    assert_eq!(by_gain_pct[0].name, "Alpha");
    assert_eq!(by_gain_pct[2].name, "Gamma");

    let entity_equities = filter_holdings(
        &snapshot,
        &HoldingsFilter {
            entity_id: Some("e1".to_string()),
            asset_class: Some(AssetClass::PublicEquities),
            ..Default::default()
        },
    );
    assert_eq!(entity_equities.len(), 1);

    let search = filter_holdings(
        &snapshot,
        &HoldingsFilter {
            search: Some("alp".to_string()),
            sort: HoldingsSort::Name,
            ..Default::default()
        },
    );
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].name, "Alpha");
}

#[test]
fn test_allocation_chart_sorted_by_value() {
    let positions = vec![
        position("a", "e1", AssetClass::Crypto, "CAD", dec!(1), dec!(1), dec!(100)),
        position("b", "e1", AssetClass::RealEstate, "CAD", dec!(1), dec!(1), dec!(700)),
        position("c", "e1", AssetClass::Bonds, "CAD", dec!(1), dec!(1), dec!(200)),
    ];
    let snapshot = build_overview(&positions, &normalizer(), &options());
    let chart = allocation_chart(&snapshot);
    let labels: Vec<&str> = chart.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Real Estate", "Bonds", "Crypto"]);
    assert_eq!(chart[0].weight, dec!(70));
}

proptest! {
    #[test]
    fn prop_weights_sum_to_one_hundred(values in prop::collection::vec(1u32..10_000_000, 1..25)) {
        let positions: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                position(
                    &format!("p{}", i),
                    "e1",
                    AssetClass::ALL[i % AssetClass::ALL.len()],
                    "CAD",
                    Decimal::ONE,
                    Decimal::ONE,
                    Decimal::from(*v),
                )
            })
            .collect();
        let snapshot = build_overview(&positions, &normalizer(), &options());

        let holding_sum: Decimal = snapshot.holdings.iter().map(|h| h.weight).sum();
        prop_assert!((holding_sum - dec!(100)).abs() < dec!(0.000001));
        let class_sum: Decimal = snapshot.by_asset_class.values().map(|g| g.weight).sum();
        prop_assert!((class_sum - dec!(100)).abs() < dec!(0.000001));
    }
}
