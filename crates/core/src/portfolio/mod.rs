//! Portfolio analytics: ledger replay, valuation, aggregation, returns, and risk.

pub mod allocation;
pub mod holdings;
pub mod ledger;
pub mod performance;
pub mod risk;
pub mod scenarios;
pub mod valuation;

pub use ledger::{replay_ledger, LedgerState};
