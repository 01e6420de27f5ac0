use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::holdings_model::{
    AllocationSlice, GroupTotals, HoldingsFilter, HoldingsSort, OverviewOptions,
    PortfolioSnapshot, PortfolioSummary, ValuedHolding,
};
use crate::constants::ONE_HUNDRED;
use crate::fx::CurrencyNormalizer;
use crate::portfolio::performance::simple_return;
use crate::portfolio::risk::{assess_risk, Exposure};
use crate::positions::{AssetClass, Position};

fn share_of(value: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        value / total * ONE_HUNDRED
    }
}

fn accumulate(group: &mut GroupTotals, holding: &ValuedHolding) {
    group.value += holding.value;
    group.cost += holding.cost;
    group.position_ids.push(holding.position_id.clone());
}

fn finish(group: &mut GroupTotals, total_value: Decimal) {
    group.gain = group.value - group.cost;
    group.gain_pct = simple_return(group.value, group.cost);
    group.weight = share_of(group.value, total_value);
}

/// Folds active positions into a [`PortfolioSnapshot`].
///
/// Values are converted to the reporting currency first. Weights are computed
/// in a second pass once the total is known. Exited positions are skipped.
pub fn build_overview(
    positions: &[Position],
    normalizer: &CurrencyNormalizer,
    options: &OverviewOptions,
) -> PortfolioSnapshot {
    let reporting = options.reporting_currency.as_str();

    let mut holdings: Vec<ValuedHolding> = positions
        .iter()
        .filter(|p| p.is_active())
        .map(|p| {
            let value = normalizer.to_reporting(p.current_value, &p.currency, reporting);
            let cost = normalizer.to_reporting(p.cost_basis, &p.currency, reporting);
            ValuedHolding {
                position_id: p.id.clone(),
                entity_id: p.entity_id.clone(),
                name: p.name.clone(),
                symbol: p.symbol.clone(),
                asset_class: p.asset_class,
                native_currency: p.currency.clone(),
                quantity: p.quantity,
                native_value: p.current_value,
                value,
                cost,
                gain: value - cost,
                gain_pct: simple_return(value, cost),
                weight: Decimal::ZERO,
                is_liquid: p.is_liquid(),
                last_price_at: p.last_price_at,
            }
        })
        .collect();

    let mut summary = PortfolioSummary {
        reporting_currency: reporting.to_string(),
        holding_count: holdings.len(),
        ..PortfolioSummary::default()
    };
    let mut by_entity: BTreeMap<String, GroupTotals> = BTreeMap::new();
    let mut by_asset_class: BTreeMap<AssetClass, GroupTotals> = BTreeMap::new();

    for holding in &holdings {
        summary.total_value += holding.value;
        summary.total_cost += holding.cost;
        let entity = by_entity
            .entry(holding.entity_id.clone())
            .or_insert_with(|| GroupTotals {
                label: options
                    .entity_names
                    .get(&holding.entity_id)
                    .cloned()
                    .unwrap_or_else(|| holding.entity_id.clone()),
                ..GroupTotals::default()
            });
        accumulate(entity, holding);
        let class = by_asset_class
            .entry(holding.asset_class)
            .or_insert_with(|| GroupTotals {
                label: holding.asset_class.display_name().to_string(),
                ..GroupTotals::default()
            });
        accumulate(class, holding);
    }

    let total_value = summary.total_value;
    summary.total_gain = summary.total_value - summary.total_cost;
    summary.total_gain_pct = simple_return(summary.total_value, summary.total_cost);
    for holding in holdings.iter_mut() {
        holding.weight = share_of(holding.value, total_value);
    }
    for group in by_entity.values_mut().chain(by_asset_class.values_mut()) {
        finish(group, total_value);
    }

    let exposures: Vec<Exposure> = holdings
        .iter()
        .map(|h| Exposure {
            name: h.name.clone(),
            value: h.value,
            asset_class: h.asset_class,
            is_liquid: h.is_liquid,
        })
        .collect();
    let risk = assess_risk(
        &exposures,
        options.concentration_threshold_pct,
        options.hhi_threshold,
    );

    debug!(
        "Built overview of {} holdings worth {} {}",
        summary.holding_count, summary.total_value, reporting
    );
    PortfolioSnapshot {
        summary,
        by_entity,
        by_asset_class,
        holdings,
        risk,
        fx_fallbacks: normalizer.fallback_pairs(),
    }
}

/// Holdings matching the filter, sorted for display.
pub fn filter_holdings(
    snapshot: &PortfolioSnapshot,
    filter: &HoldingsFilter,
) -> Vec<ValuedHolding> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<ValuedHolding> = snapshot
        .holdings
        .iter()
        .filter(|h| filter.entity_id.as_ref().map_or(true, |id| &h.entity_id == id))
        .filter(|h| filter.asset_class.map_or(true, |class| h.asset_class == class))
        .filter(|h| {
            needle.as_ref().map_or(true, |needle| {
                h.name.to_lowercase().contains(needle.as_str())
                    || h.symbol
                        .as_ref()
                        .is_some_and(|s| s.to_lowercase().contains(needle.as_str()))
            })
        })
        .cloned()
        .collect();

    match filter.sort {
        HoldingsSort::Value => rows.sort_by(|a, b| b.value.cmp(&a.value)),
        HoldingsSort::Gain => rows.sort_by(|a, b| b.gain.cmp(&a.gain)),
        HoldingsSort::GainPct => rows.sort_by(|a, b| b.gain_pct.cmp(&a.gain_pct)),
        HoldingsSort::Name => rows.sort_by_key(|h| h.name.to_lowercase()),
    }
    rows
}

/// Asset-class slices, largest first.
pub fn allocation_chart(snapshot: &PortfolioSnapshot) -> Vec<AllocationSlice> {
    let mut slices: Vec<AllocationSlice> = snapshot
        .by_asset_class
        .iter()
        .map(|(class, totals)| AllocationSlice {
            label: totals.label.clone(),
            asset_class: *class,
            value: totals.value,
            weight: totals.weight,
        })
        .collect();
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}
