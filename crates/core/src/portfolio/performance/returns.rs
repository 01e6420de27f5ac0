use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::constants::ONE_HUNDRED;

/// `(current - cost) / cost * 100`, or 0 when cost is 0.
pub fn simple_return(current_value: Decimal, cost_basis: Decimal) -> Decimal {
    if cost_basis.is_zero() {
        return Decimal::ZERO;
    }
    (current_value - cost_basis) / cost_basis * ONE_HUNDRED
}

/// `(end - begin - net_flows) / begin * 100`, or 0 when begin is 0.
///
/// Contributions are positive flows and withdrawals negative.
pub fn holding_period_return(
    beginning_value: Decimal,
    ending_value: Decimal,
    net_flows: Decimal,
) -> Decimal {
    if beginning_value.is_zero() {
        return Decimal::ZERO;
    }
    (ending_value - beginning_value - net_flows) / beginning_value * ONE_HUNDRED
}

/// Chains periodic returns given as decimals (0.05 for 5%) and reports the
/// cumulative result as a percentage.
pub fn time_weighted_return(period_returns: &[Decimal]) -> Decimal {
    if period_returns.is_empty() {
        return Decimal::ZERO;
    }
    let growth = period_returns
        .iter()
        .fold(Decimal::ONE, |acc, r| acc * (Decimal::ONE + r));
    (growth - Decimal::ONE) * ONE_HUNDRED
}

/// Annualizes a total return given as a decimal. Returns a percentage.
pub fn annualize_return(total_return: Decimal, years: Decimal) -> Decimal {
    if years <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // A total loss (or worse) has no real root.
    if total_return <= dec!(-1) {
        return dec!(-100);
    }
    let base = Decimal::ONE + total_return;
    let exponent = Decimal::ONE / years;
    (base.powd(exponent) - Decimal::ONE) * ONE_HUNDRED
}

/// Income as a percentage of current value, or 0 for an empty value.
pub fn income_yield(income: Decimal, value: Decimal) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }
    income / value * ONE_HUNDRED
}
