//! SQLite storage implementation for manual valuation marks.

mod model;
mod repository;

pub use model::ValuationDB;
pub use repository::ValuationRepository;
