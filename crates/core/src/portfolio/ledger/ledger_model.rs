use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity and cost basis reproduced from a position's transactions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    /// `cost_basis / quantity` when quantity > 0, otherwise 0.
    pub cost_per_unit: Decimal,
    /// Proceeds minus relieved cost, summed over disposals.
    pub realized_gain: Decimal,
    pub first_acquired_on: Option<NaiveDate>,
}
