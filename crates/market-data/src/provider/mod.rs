//! Market data provider traits and built-in providers.

mod capabilities;
pub mod manual;
mod traits;

pub use capabilities::ProviderCapabilities;
pub use traits::{FxRateProvider, MarketDataProvider};
