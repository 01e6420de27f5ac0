//! Positions module - holdings owned by an entity.

mod positions_constants;
mod positions_model;
mod positions_service;
mod positions_traits;

pub use positions_constants::*;
pub use positions_model::*;
pub use positions_service::*;
pub use positions_traits::*;
