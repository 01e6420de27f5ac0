//! SQLite storage implementation for positions.

mod model;
mod repository;

pub use model::PositionDB;
pub use repository::PositionRepository;

pub use wealthdesk_core::positions::PositionRepositoryTrait;
