//! SQLite storage implementation for exchange rates.

mod model;
mod repository;

pub use model::ExchangeRateDB;
pub use repository::FxRepository;
