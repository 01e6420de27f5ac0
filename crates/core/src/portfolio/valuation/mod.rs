//! Position valuation: pricing rules, manual marks, and batch price refresh.

mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_calculator::*;
pub use valuation_model::*;
pub use valuation_service::*;
pub use valuation_traits::*;
