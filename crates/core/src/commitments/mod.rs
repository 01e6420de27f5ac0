//! Commitments module - pledged capital for private funds.

mod commitments_calculator;
mod commitments_model;
mod commitments_service;
mod commitments_traits;

pub use commitments_calculator::*;
pub use commitments_model::*;
pub use commitments_service::*;
pub use commitments_traits::*;

#[cfg(test)]
mod commitments_service_tests;
