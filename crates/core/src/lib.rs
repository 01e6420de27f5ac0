//! Wealthdesk Core - Domain entities, analytics, services, and traits.
//!
//! This crate contains the portfolio analytics and risk-register logic for a
//! family office. It is database-agnostic and defines repository traits that
//! are implemented by the `storage-sqlite` crate.

pub mod advisor;
pub mod commitments;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod positions;
pub mod risks;
pub mod settings;
pub mod transactions;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the analytics surface
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
