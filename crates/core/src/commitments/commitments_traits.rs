use async_trait::async_trait;
use rust_decimal::Decimal;

use super::commitments_model::{
    Commitment, CommitmentBalances, CommitmentDiscrepancy, CommitmentReconciliation,
    CommitmentUpdate, FundMultiples, NewCommitment,
};
use crate::errors::Result;

#[async_trait]
pub trait CommitmentRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Commitment>>;
    fn get_by_id(&self, commitment_id: &str) -> Result<Commitment>;
    fn get_by_position(&self, position_id: &str) -> Result<Option<Commitment>>;
    async fn create(&self, new_commitment: NewCommitment) -> Result<Commitment>;
    async fn update(&self, commitment_update: CommitmentUpdate) -> Result<Commitment>;
    async fn update_balances(
        &self,
        commitment_id: &str,
        balances: CommitmentBalances,
    ) -> Result<Commitment>;
    async fn delete(&self, commitment_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait CommitmentServiceTrait: Send + Sync {
    fn list_commitments(&self) -> Result<Vec<Commitment>>;
    fn get_commitment(&self, commitment_id: &str) -> Result<Commitment>;
    /// Every commitment whose balances do not add up. Nothing is corrected.
    fn check_all(&self) -> Result<Vec<CommitmentDiscrepancy>>;
    /// Multiples using the linked position's current value as NAV.
    fn fund_multiples(&self, commitment_id: &str) -> Result<FundMultiples>;
    fn reconcile(&self, commitment_id: &str) -> Result<CommitmentReconciliation>;
    async fn create_commitment(&self, new_commitment: NewCommitment) -> Result<Commitment>;
    async fn update_commitment(&self, commitment_update: CommitmentUpdate) -> Result<Commitment>;
    async fn delete_commitment(&self, commitment_id: &str) -> Result<()>;
    async fn record_capital_call(&self, commitment_id: &str, amount: Decimal)
        -> Result<Commitment>;
    async fn record_distribution(&self, commitment_id: &str, amount: Decimal)
        -> Result<Commitment>;
    async fn restate(
        &self,
        commitment_id: &str,
        total_commitment: Decimal,
        capital_called: Decimal,
    ) -> Result<Commitment>;
}
