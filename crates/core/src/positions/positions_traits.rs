use async_trait::async_trait;

use super::positions_model::{NewPosition, Position, PositionStatus, PositionUpdate, ValuationUpdate};
use crate::errors::Result;
use crate::portfolio::ledger::LedgerState;

/// Trait defining the contract for Position repository operations.
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Position>>;
    fn list_active(&self) -> Result<Vec<Position>>;
    fn list_by_entity(&self, entity_id: &str) -> Result<Vec<Position>>;
    fn get_by_id(&self, position_id: &str) -> Result<Position>;
    async fn create(&self, new_position: NewPosition) -> Result<Position>;
    async fn update(&self, position_update: PositionUpdate) -> Result<Position>;
    /// Writes the outcome of a ledger replay.
    async fn update_ledger(&self, position_id: &str, state: LedgerState) -> Result<Position>;
    async fn update_valuation(&self, position_id: &str, update: ValuationUpdate)
        -> Result<Position>;
    async fn set_status(&self, position_id: &str, status: PositionStatus) -> Result<Position>;
}

/// Trait defining the contract for Position service operations.
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    fn get_positions(&self) -> Result<Vec<Position>>;
    fn get_active_positions(&self) -> Result<Vec<Position>>;
    fn get_position(&self, position_id: &str) -> Result<Position>;
    async fn create_position(&self, new_position: NewPosition) -> Result<Position>;
    async fn update_position(&self, position_update: PositionUpdate) -> Result<Position>;
    /// Soft delete: the position stays for history but drops out of overviews.
    async fn exit_position(&self, position_id: &str) -> Result<Position>;
    async fn reactivate_position(&self, position_id: &str) -> Result<Position>;
}
