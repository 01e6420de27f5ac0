//! SQLite storage implementation for the risk register.

mod model;
mod repository;

pub use model::RiskDB;
pub use repository::RiskRepository;
