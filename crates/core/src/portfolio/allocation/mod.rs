//! Target allocation, drift against the current snapshot and rebalancing.

mod allocation_calculator;
mod allocation_model;
mod allocation_service;

pub use allocation_calculator::*;
pub use allocation_model::*;
pub use allocation_service::*;
