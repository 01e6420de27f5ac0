//! FX (Foreign Exchange) module - rate models, lookup, normalization, and service.

mod currency_normalizer;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;
mod rate_table;

pub use currency_normalizer::{convert, CurrencyNormalizer};
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, FxRefreshSummary, NewExchangeRate};
pub use fx_service::FxService;
pub use fx_traits::{FxRepositoryTrait, FxServiceTrait, RateLookup};
pub use rate_table::RateTable;
