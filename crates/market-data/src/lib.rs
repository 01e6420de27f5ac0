//! Wealthdesk Market Data Crate
//!
//! Provider-agnostic price and FX quote capabilities.
//!
//! The core crate never talks to a price feed directly. It asks a
//! [`ProviderRegistry`] for a [`PriceSnapshot`] (or an [`FxQuote`]) and gets
//! back either a value or a [`MarketDataError`]. Concrete fetch adapters live
//! outside this workspace and only need to implement [`MarketDataProvider`]
//! or [`FxRateProvider`].
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |   Core services  | --> | ProviderRegistry | --> |  QuoteCache (TTL)|
//! +------------------+     +------------------+     +------------------+
//!                                  |
//!                                  v
//!                     +-------------------------+
//!                     | providers by priority   |  (fallback chain)
//!                     +-------------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::{MarketDataError, RetryClass};
pub use models::{AssetKind, FxQuote, PriceSnapshot, ProviderId, QuoteRequest};
pub use provider::manual::ManualProvider;
pub use provider::{FxRateProvider, MarketDataProvider, ProviderCapabilities};
pub use registry::{ProviderRegistry, QuoteCache, DEFAULT_QUOTE_TTL};
