use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::transactions_model::{NewTransaction, Transaction, TransactionUpdate};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::{CalculatorError, Result};
use crate::portfolio::holdings::{ChangeSink, NoOpChangeSink};
use crate::portfolio::ledger::replay_ledger;
use crate::portfolio::valuation::value_position;
use crate::positions::{Position, PositionRepositoryTrait};

pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    change_sink: Arc<dyn ChangeSink>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            position_repository,
            change_sink: Arc::new(NoOpChangeSink),
        }
    }

    /// Sets the sink notified after every ledger change.
    pub fn with_change_sink(mut self, change_sink: Arc<dyn ChangeSink>) -> Self {
        self.change_sink = change_sink;
        self
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self, position_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_for_position(position_id)
    }

    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let new_transaction = new_transaction.with_derived_total();
        new_transaction.validate()?;
        // Fails early when the position does not exist.
        self.position_repository
            .get_by_id(&new_transaction.position_id)?;

        let created = self.repository.create(new_transaction).await?;
        info!(
            "Added {} transaction {} to position {}",
            created.transaction_type, created.id, created.position_id
        );
        self.recalculate_position(&created.position_id).await?;
        Ok(created)
    }

    async fn update_transaction(
        &self,
        transaction_update: TransactionUpdate,
    ) -> Result<Transaction> {
        let transaction_update = transaction_update.with_derived_total();
        transaction_update.validate()?;
        let updated = self.repository.update(transaction_update).await?;
        self.recalculate_position(&updated.position_id).await?;
        Ok(updated)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let deleted = self.repository.delete(transaction_id).await?;
        info!(
            "Deleted transaction {} from position {}",
            deleted.id, deleted.position_id
        );
        self.recalculate_position(&deleted.position_id).await?;
        Ok(deleted)
    }

    async fn recalculate_position(&self, position_id: &str) -> Result<Position> {
        let transactions = self.repository.list_for_position(position_id)?;
        if let Some(foreign) = transactions.iter().find(|t| t.position_id != position_id) {
            return Err(CalculatorError::ForeignTransaction {
                transaction_id: foreign.id.clone(),
                expected: position_id.to_string(),
                found: foreign.position_id.clone(),
            }
            .into());
        }

        let state = replay_ledger(&transactions);
        debug!(
            "Replayed {} transactions for {}: qty={} cost={}",
            transactions.len(),
            position_id,
            state.quantity,
            state.cost_basis
        );
        let position = self
            .position_repository
            .update_ledger(position_id, state)
            .await?;
        // Keep current_value in step with the new quantity.
        let valuation = value_position(&position, None);
        let position = self
            .position_repository
            .update_valuation(position_id, valuation.into_update(&position))
            .await?;
        self.change_sink.portfolio_changed();
        Ok(position)
    }
}
