//! Money-weighted return (XIRR) over irregularly dated cash flows.
//!
//! The solver works in `f64` because it needs fractional powers in a tight
//! loop. A bracketed Brent search runs first; when the NPV does not change
//! sign on the bracket, a Newton search from the seed takes over. If both
//! fail the rate is undefined and `None` is returned.

use chrono::NaiveDate;
use log::{debug, warn};
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_YEAR, ONE_HUNDRED};

/// A dated, signed cash flow. Investments are negative, returns positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// Tunable solver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XirrConfig {
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub seed: Decimal,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for XirrConfig {
    fn default() -> Self {
        Self {
            lower_bound: dec!(-0.9999),
            upper_bound: dec!(10),
            seed: dec!(0.1),
            max_iterations: 1000,
            tolerance: 1e-10,
        }
    }
}

/// Annual IRR as a percentage.
///
/// `current_value` is appended as a final inflow on `as_of`. Returns `None`
/// when the series has fewer than two flows, lacks either an outflow or an
/// inflow, or when neither solver converges.
pub fn compute_irr(
    cash_flows: &[CashFlow],
    current_value: Decimal,
    as_of: NaiveDate,
    config: &XirrConfig,
) -> Option<Decimal> {
    if cash_flows.is_empty() {
        return None;
    }
    let mut flows = cash_flows.to_vec();
    flows.sort_by_key(|flow| flow.date);
    flows.push(CashFlow::new(as_of, current_value));

    let rate = xirr(&flows, config)?;
    Decimal::from_f64(rate).map(|r| (r * ONE_HUNDRED).round_dp(4))
}

/// Annual rate as a decimal. Flows must already be in date order.
pub fn xirr(flows: &[CashFlow], config: &XirrConfig) -> Option<f64> {
    if flows.len() < 2 {
        return None;
    }
    let has_outflow = flows.iter().any(|f| f.amount < Decimal::ZERO);
    let has_inflow = flows.iter().any(|f| f.amount > Decimal::ZERO);
    if !(has_outflow && has_inflow) {
        debug!("XIRR undefined for a one-directional cash-flow series");
        return None;
    }

    let first = flows[0].date;
    let days_per_year = DAYS_PER_YEAR.to_f64()?;
    let mut series = Vec::with_capacity(flows.len());
    for flow in flows {
        let years = (flow.date - first).num_days() as f64 / days_per_year;
        series.push((years, flow.amount.to_f64()?));
    }

    let npv = |rate: f64| -> f64 {
        series
            .iter()
            .map(|(t, amount)| amount / (1.0 + rate).powf(*t))
            .sum()
    };

    let lower = config.lower_bound.to_f64()?;
    let upper = config.upper_bound.to_f64()?;
    if let Some(rate) = brent(&npv, lower, upper, config) {
        return Some(rate);
    }

    warn!(
        "XIRR bracket [{}, {}] failed; falling back to Newton from {}",
        lower, upper, config.seed
    );
    let derivative = |rate: f64| -> f64 {
        series
            .iter()
            .map(|(t, amount)| -t * amount / (1.0 + rate).powf(t + 1.0))
            .sum()
    };
    let result = newton(&npv, &derivative, config.seed.to_f64()?, config);
    if result.is_none() {
        warn!("XIRR did not converge; rate is undefined");
    }
    result
}

#[allow(clippy::many_single_char_names)]
fn brent<F>(f: &F, a: f64, b: f64, config: &XirrConfig) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let (mut fa, mut fb) = (f(a), f(b));
    if !fa.is_finite() || !fb.is_finite() || fa * fb > 0.0 {
        return None;
    }
    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..config.max_iterations {
        if fb.abs() < config.tolerance || (b - a).abs() < config.tolerance {
            return Some(b);
        }

        let mut use_bisection = true;
        let mut s = 0.0;
        if (fa - fc).abs() > f64::EPSILON && (fb - fc).abs() > f64::EPSILON {
            // Inverse quadratic interpolation
            let r = fb / fc;
            let p = fa / fc;
            let q = fa / fb;
            s = b - (q * (q - r) * (b - a) + (1.0 - r) * (b - c) * p)
                / ((q - 1.0) * (r - 1.0) * (p - 1.0));
        } else if (fb - fa).abs() > f64::EPSILON {
            s = b - fb * (b - a) / (fb - fa);
        }
        let m = (a + b) / 2.0;
        if s > m.min(b) && s < m.max(b) && (s - b).abs() < e.abs() / 2.0 {
            use_bisection = false;
        }

        if use_bisection {
            s = m;
            e = b - a;
            d = e;
        } else {
            e = d;
            d = s - b;
        }

        c = b;
        fc = fb;
        let fs = f(s);
        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }
    None
}

fn newton<F, D>(f: &F, df: &D, seed: f64, config: &XirrConfig) -> Option<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut rate = seed;
    for _ in 0..config.max_iterations {
        let value = f(rate);
        if value.abs() < config.tolerance {
            return Some(rate);
        }
        let slope = df(rate);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= -1.0 {
            return None;
        }
        if (next - rate).abs() < config.tolerance {
            return Some(next);
        }
        rate = next;
    }
    None
}
