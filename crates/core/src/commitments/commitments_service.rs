use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::commitments_calculator::{
    apply_capital_call, apply_distribution, check_consistency, fund_multiples, reconcile,
    restated_balances,
};
use super::commitments_model::{
    Commitment, CommitmentDiscrepancy, CommitmentReconciliation, CommitmentUpdate, FundMultiples,
    NewCommitment,
};
use super::commitments_traits::{CommitmentRepositoryTrait, CommitmentServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::fx::FxServiceTrait;
use crate::positions::{AssetClass, PositionRepositoryTrait};
use crate::settings::SettingsServiceTrait;
use crate::transactions::TransactionRepositoryTrait;

fn accepts_commitment(asset_class: AssetClass) -> bool {
    matches!(asset_class, AssetClass::Fund | AssetClass::VentureFund)
}

pub struct CommitmentService {
    repository: Arc<dyn CommitmentRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl CommitmentService {
    pub fn new(
        repository: Arc<dyn CommitmentRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            repository,
            position_repository,
            transaction_repository,
            fx_service,
            settings_service,
        }
    }

    fn flag(&self, commitment: &Commitment) -> Option<CommitmentDiscrepancy> {
        let discrepancy = check_consistency(commitment)?;
        warn!(
            "Commitment {} ({}) is inconsistent: called {} + unfunded {} differs from total {} by {}",
            discrepancy.commitment_id,
            discrepancy.fund_name,
            discrepancy.capital_called,
            discrepancy.unfunded_commitment,
            discrepancy.total_commitment,
            discrepancy.difference
        );
        Some(discrepancy)
    }
}

#[async_trait]
impl CommitmentServiceTrait for CommitmentService {
    fn list_commitments(&self) -> Result<Vec<Commitment>> {
        self.repository.list()
    }

    fn get_commitment(&self, commitment_id: &str) -> Result<Commitment> {
        self.repository.get_by_id(commitment_id)
    }

    fn check_all(&self) -> Result<Vec<CommitmentDiscrepancy>> {
        Ok(self
            .repository
            .list()?
            .iter()
            .filter_map(|c| self.flag(c))
            .collect())
    }

    fn fund_multiples(&self, commitment_id: &str) -> Result<FundMultiples> {
        let commitment = self.repository.get_by_id(commitment_id)?;
        let position = self.position_repository.get_by_id(&commitment.position_id)?;
        let nav = if position.currency == commitment.currency {
            position.current_value
        } else {
            let settings = self.settings_service.get_analytics_settings()?;
            self.fx_service
                .normalizer(settings.fallback_fx_rate)?
                .to_reporting(position.current_value, &position.currency, &commitment.currency)
        };
        Ok(fund_multiples(&commitment, nav))
    }

    fn reconcile(&self, commitment_id: &str) -> Result<CommitmentReconciliation> {
        let commitment = self.repository.get_by_id(commitment_id)?;
        let transactions = self
            .transaction_repository
            .list_for_position(&commitment.position_id)?;
        let result = reconcile(&commitment, &transactions);
        if !result.is_reconciled {
            warn!(
                "Commitment {} records {} called but the ledger shows {}",
                commitment.fund_name, result.recorded_called, result.transactions_called
            );
        }
        Ok(result)
    }

    async fn create_commitment(&self, new_commitment: NewCommitment) -> Result<Commitment> {
        new_commitment.validate()?;
        let position = self
            .position_repository
            .get_by_id(&new_commitment.position_id)?;
        if !accepts_commitment(position.asset_class) {
            return Err(ValidationError::InvalidInput(format!(
                "Position {} is {}, commitments need a fund position",
                position.name, position.asset_class
            ))
            .into());
        }
        if self
            .repository
            .get_by_position(&position.id)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(format!(
                "Position {} already has a commitment",
                position.name
            )));
        }

        let new_commitment = NewCommitment {
            unfunded_commitment: Some(new_commitment.resolved_unfunded()),
            ..new_commitment
        };
        let created = self.repository.create(new_commitment).await?;
        info!(
            "Created commitment {} of {} {}",
            created.fund_name, created.total_commitment, created.currency
        );
        self.flag(&created);
        Ok(created)
    }

    async fn update_commitment(&self, commitment_update: CommitmentUpdate) -> Result<Commitment> {
        if commitment_update.fund_name.trim().is_empty() {
            return Err(ValidationError::MissingField("fundName".to_string()).into());
        }
        self.repository.update(commitment_update).await
    }

    async fn delete_commitment(&self, commitment_id: &str) -> Result<()> {
        let deleted = self.repository.delete(commitment_id).await?;
        debug!("Deleted {} commitment row(s) for {}", deleted, commitment_id);
        Ok(())
    }

    async fn record_capital_call(
        &self,
        commitment_id: &str,
        amount: Decimal,
    ) -> Result<Commitment> {
        let commitment = self.repository.get_by_id(commitment_id)?;
        let balances = apply_capital_call(&commitment, amount)?;
        let updated = self
            .repository
            .update_balances(commitment_id, balances)
            .await?;
        info!(
            "Capital call of {} on {}: unfunded now {}",
            amount, updated.fund_name, updated.unfunded_commitment
        );
        self.flag(&updated);
        Ok(updated)
    }

    async fn record_distribution(
        &self,
        commitment_id: &str,
        amount: Decimal,
    ) -> Result<Commitment> {
        let commitment = self.repository.get_by_id(commitment_id)?;
        let balances = apply_distribution(&commitment, amount)?;
        self.repository
            .update_balances(commitment_id, balances)
            .await
    }

    async fn restate(
        &self,
        commitment_id: &str,
        total_commitment: Decimal,
        capital_called: Decimal,
    ) -> Result<Commitment> {
        let commitment = self.repository.get_by_id(commitment_id)?;
        let balances = restated_balances(&commitment, total_commitment, capital_called)?;
        let updated = self
            .repository
            .update_balances(commitment_id, balances)
            .await?;
        info!(
            "Restated commitment {}: total {} -> {}, called {} -> {}, unfunded {} -> {}",
            updated.fund_name,
            commitment.total_commitment,
            updated.total_commitment,
            commitment.capital_called,
            updated.capital_called,
            commitment.unfunded_commitment,
            updated.unfunded_commitment
        );
        Ok(updated)
    }
}
