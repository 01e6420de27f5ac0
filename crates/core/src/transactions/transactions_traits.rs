use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction, TransactionUpdate};
use crate::errors::Result;
use crate::positions::Position;

/// Trait defining the contract for Transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    /// All transactions of a position, ordered by date.
    fn list_for_position(&self, position_id: &str) -> Result<Vec<Transaction>>;
    fn list(&self) -> Result<Vec<Transaction>>;
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update(&self, transaction_update: TransactionUpdate) -> Result<Transaction>;
    async fn delete(&self, transaction_id: &str) -> Result<Transaction>;
}

/// Trait defining the contract for Transaction service operations.
///
/// Every write is followed by a full ledger replay of the affected position.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transactions(&self, position_id: &str) -> Result<Vec<Transaction>>;
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update_transaction(&self, transaction_update: TransactionUpdate)
        -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    async fn recalculate_position(&self, position_id: &str) -> Result<Position>;
}
