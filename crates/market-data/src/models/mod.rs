//! Market data models.

mod quote;
mod types;

pub use quote::{FxQuote, PriceSnapshot, QuoteRequest};
pub use types::{AssetKind, ProviderId};
