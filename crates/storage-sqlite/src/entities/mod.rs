//! SQLite storage implementation for entities.

mod model;
mod repository;

pub use model::{EntityDB, NewEntityDB};
pub use repository::EntityRepository;

pub use wealthdesk_core::entities::EntityRepositoryTrait;
