//! Advisory narratives from an external text generator.
//!
//! Prompts are built from already-computed analytics. The generator is an
//! opaque capability, and every failure degrades to "no advice".

mod advisor_model;
mod advisor_prompts;
mod advisor_service;

pub use advisor_model::*;
pub use advisor_prompts::*;
pub use advisor_service::*;
