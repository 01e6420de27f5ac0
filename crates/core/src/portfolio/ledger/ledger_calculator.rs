use log::{debug, warn};
use rust_decimal::Decimal;

use super::ledger_model::LedgerState;
use crate::transactions::{LedgerEffect, Transaction};

/// Replays a position's transactions from zero using average cost.
///
/// The input is stably sorted by date first, so same-day entries keep the
/// order they were given in. The function holds no state between calls:
/// replaying the same list always gives the same result.
pub fn replay_ledger(transactions: &[Transaction]) -> LedgerState {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| tx.date);

    let mut quantity = Decimal::ZERO;
    let mut cost_basis = Decimal::ZERO;
    let mut realized_gain = Decimal::ZERO;
    let mut first_acquired_on = None;

    for tx in ordered {
        match tx.transaction_type.ledger_effect() {
            LedgerEffect::Acquire => {
                quantity += tx.quantity;
                cost_basis += tx.total_amount;
                first_acquired_on.get_or_insert(tx.date);
            }
            LedgerEffect::Dispose => {
                if quantity > Decimal::ZERO {
                    let avg_cost = cost_basis / quantity;
                    let relieved_units = if tx.quantity > quantity {
                        warn!(
                            "Transaction {} disposes {} units but only {} are held; relieving cost for held units only",
                            tx.id, tx.quantity, quantity
                        );
                        quantity
                    } else {
                        tx.quantity
                    };
                    let relieved_cost = avg_cost * relieved_units;
                    cost_basis -= relieved_cost;
                    realized_gain += tx.total_amount - relieved_cost;
                    if cost_basis < Decimal::ZERO {
                        warn!(
                            "Cost basis went negative ({}) after transaction {}, clamping to zero",
                            cost_basis, tx.id
                        );
                        cost_basis = Decimal::ZERO;
                    }
                } else {
                    warn!(
                        "Transaction {} disposes {} units from a position holding {}; cost basis unchanged",
                        tx.id, tx.quantity, quantity
                    );
                }
                quantity -= tx.quantity;
            }
            LedgerEffect::Neutral => {
                debug!(
                    "Transaction {} ({}) has no ledger effect",
                    tx.id, tx.transaction_type
                );
            }
        }
    }

    let cost_per_unit = if quantity > Decimal::ZERO {
        cost_basis / quantity
    } else {
        Decimal::ZERO
    };

    LedgerState {
        quantity,
        cost_basis,
        cost_per_unit,
        realized_gain,
        first_acquired_on,
    }
}
