//! Entities module - ownership vehicles (corporations, individuals, trusts).

mod entities_model;
mod entities_service;
mod entities_traits;

pub use entities_model::*;
pub use entities_service::*;
pub use entities_traits::*;
