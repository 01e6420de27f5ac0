//! SQLite storage implementation for private fund commitments.

mod model;
mod repository;

pub use model::CommitmentDB;
pub use repository::CommitmentRepository;
