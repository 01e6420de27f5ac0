//! Cost-basis ledger using average-cost accounting.

mod ledger_calculator;
mod ledger_model;

pub use ledger_calculator::*;
pub use ledger_model::*;
