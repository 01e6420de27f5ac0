//! What-if stress tests: per-asset-class shocks applied to a snapshot.

mod scenario_calculator;
mod scenario_model;
mod scenario_presets;

pub use scenario_calculator::*;
pub use scenario_model::*;
pub use scenario_presets::{preset, preset_scenarios, PRESET_IDS};
