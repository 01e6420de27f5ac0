use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{ONE_HUNDRED, PERIODS_PER_YEAR};

/// Risk statistics for a series of periodic (monthly) returns in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub avg_return: Decimal,
    pub volatility: Decimal,
    pub sharpe_ratio: Decimal,
    /// Worst peak-to-trough decline in percent. Zero or negative.
    pub max_drawdown: Decimal,
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

/// Population standard deviation of the returns.
pub fn volatility(returns: &[Decimal]) -> Decimal {
    if returns.len() < 2 {
        return Decimal::ZERO;
    }
    let avg = mean(returns);
    let variance = returns
        .iter()
        .map(|r| (r - avg) * (r - avg))
        .sum::<Decimal>()
        / Decimal::from(returns.len());
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// `(mean - rf_annual/12) / volatility`, or 0 for a flat series.
pub fn sharpe_ratio(returns: &[Decimal], risk_free_annual_pct: Decimal) -> Decimal {
    let vol = volatility(returns);
    if vol.is_zero() {
        return Decimal::ZERO;
    }
    let periodic_risk_free = risk_free_annual_pct / PERIODS_PER_YEAR;
    (mean(returns) - periodic_risk_free) / vol
}

/// Running peak is taken over the cumulative series only, so a loss in the
/// first period is not a drawdown.
pub fn max_drawdown(returns: &[Decimal]) -> Decimal {
    let mut cumulative = Decimal::ONE;
    let mut peak: Option<Decimal> = None;
    let mut worst = Decimal::ZERO;
    for r in returns {
        cumulative *= Decimal::ONE + r / ONE_HUNDRED;
        let running_max = peak.map_or(cumulative, |p| p.max(cumulative));
        peak = Some(running_max);
        if running_max > Decimal::ZERO {
            let drawdown = (cumulative - running_max) / running_max * ONE_HUNDRED;
            worst = worst.min(drawdown);
        }
    }
    worst
}

pub fn risk_metrics(returns: &[Decimal], risk_free_annual_pct: Decimal) -> RiskMetrics {
    if returns.len() < 2 {
        return RiskMetrics::default();
    }
    RiskMetrics {
        avg_return: mean(returns),
        volatility: volatility(returns),
        sharpe_ratio: sharpe_ratio(returns, risk_free_annual_pct),
        max_drawdown: max_drawdown(returns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_volatility_population() {
        // mean 5, deviations +-3 -> population stdev 3
        let vol = volatility(&[dec!(2), dec!(8)]);
        assert_eq!(vol.round_dp(8), dec!(3));
        assert_eq!(volatility(&[dec!(4)]), Decimal::ZERO);
    }

    #[test]
    fn test_sharpe_uses_monthly_risk_free() {
        // mean 5, vol 3, rf 12%/12 = 1 -> (5 - 1) / 3
        let sharpe = sharpe_ratio(&[dec!(2), dec!(8)], dec!(12));
        assert_eq!(sharpe.round_dp(6), dec!(1.333333));
    }

    #[test]
    fn test_sharpe_flat_series_is_zero() {
        assert_eq!(sharpe_ratio(&[dec!(1), dec!(1), dec!(1)], dec!(4)), Decimal::ZERO);
    }

    #[test]
    fn test_max_drawdown() {
        // 1.0 -> 1.1 -> 0.88 -> 0.968: trough is 20% below the 1.1 peak.
        let dd = max_drawdown(&[dec!(10), dec!(-20), dec!(10)]);
        assert_eq!(dd, dec!(-20));
        assert_eq!(max_drawdown(&[dec!(1), dec!(2)]), Decimal::ZERO);
        assert_eq!(max_drawdown(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_max_drawdown_ignores_opening_loss() {
        // 0.7 -> 0.77: the series never falls below its own first value.
        assert_eq!(max_drawdown(&[dec!(-30), dec!(10)]), Decimal::ZERO);
        // 0.7 -> 0.77 -> 0.616: 20% below the 0.77 peak.
        assert_eq!(max_drawdown(&[dec!(-30), dec!(10), dec!(-20)]), dec!(-20));
    }

    #[test]
    fn test_short_series_reports_zeros() {
        assert_eq!(risk_metrics(&[dec!(-30)], dec!(4)), RiskMetrics::default());
        let metrics = risk_metrics(&[dec!(2), dec!(8)], dec!(12));
        assert_eq!(metrics.avg_return, dec!(5));
        assert_eq!(metrics.max_drawdown, Decimal::ZERO);
    }
}
