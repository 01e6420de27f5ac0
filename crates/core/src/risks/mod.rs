//! Risk register - likelihood x impact scoring, filtering, review scheduling.

mod risks_calculator;
mod risks_model;
mod risks_service;
mod risks_traits;

pub use risks_calculator::*;
pub use risks_model::*;
pub use risks_service::*;
pub use risks_traits::*;
