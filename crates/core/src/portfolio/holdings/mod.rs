//! Portfolio snapshot: grouped totals, weighted holdings and risk summary.

mod holdings_calculator;
mod holdings_model;
mod holdings_service;

pub use holdings_calculator::*;
pub use holdings_model::*;
pub use holdings_service::*;

#[cfg(test)]
mod holdings_calculator_tests;
