//! Repository and service traits for position valuations.

use async_trait::async_trait;

use super::valuation_model::{NewValuation, PriceRefreshSummary, Valuation};
use crate::errors::Result;
use crate::positions::Position;

/// Repository trait for manual valuation records.
#[async_trait]
pub trait ValuationRepositoryTrait: Send + Sync {
    /// All marks for a position, newest first.
    fn list_for_position(&self, position_id: &str) -> Result<Vec<Valuation>>;
    fn latest_for_position(&self, position_id: &str) -> Result<Option<Valuation>>;
    async fn create(&self, new_valuation: NewValuation) -> Result<Valuation>;
    async fn delete(&self, valuation_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    fn get_valuations(&self, position_id: &str) -> Result<Vec<Valuation>>;
    /// Stores a mark and revalues the position from it.
    async fn record_valuation(&self, new_valuation: NewValuation) -> Result<Valuation>;
    /// Refreshes every active position. Individual failures are collected, never raised.
    async fn refresh_prices(&self) -> Result<PriceRefreshSummary>;
    async fn refresh_positions(&self, positions: Vec<Position>) -> Result<PriceRefreshSummary>;
}
