//! Provider registry and quote cache.

mod quote_cache;
#[allow(clippy::module_inception)]
mod registry;

pub use quote_cache::{QuoteCache, DEFAULT_QUOTE_TTL};
pub use registry::ProviderRegistry;
