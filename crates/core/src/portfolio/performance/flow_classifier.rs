//! Turns ledger transactions into signed cash flows for money-weighted returns.
//!
//! Buys, capital calls and fees are outflows. Sales, capital returns and
//! income are inflows. Transfers and valuation marks are not cash flows.

use super::xirr::CashFlow;
use crate::fx::CurrencyNormalizer;
use crate::transactions::Transaction;

/// Signed cash flow in the reporting currency, or `None` for non-cash entries.
pub fn classify_flow(
    transaction: &Transaction,
    normalizer: &CurrencyNormalizer,
    reporting_currency: &str,
) -> Option<CashFlow> {
    let sign = transaction.transaction_type.cash_flow_sign()?;
    let amount = normalizer.to_reporting(
        transaction.total_amount,
        &transaction.currency,
        reporting_currency,
    );
    Some(CashFlow::new(transaction.date, sign * amount))
}

pub fn cash_flows_for(
    transactions: &[Transaction],
    normalizer: &CurrencyNormalizer,
    reporting_currency: &str,
) -> Vec<CashFlow> {
    transactions
        .iter()
        .filter_map(|t| classify_flow(t, normalizer, reporting_currency))
        .collect()
}
