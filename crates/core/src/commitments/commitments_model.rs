//! Commitment domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Capital pledged to a fund, linked to exactly one fund position.
///
/// `capital_called + unfunded_commitment == total_commitment` should hold.
/// Unfunded only goes down through capital calls; a restatement is the one
/// way to raise it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub id: String,
    pub position_id: String,
    pub fund_name: String,
    pub vintage_year: Option<i32>,
    pub total_commitment: Decimal,
    pub capital_called: Decimal,
    pub unfunded_commitment: Decimal,
    pub distributions_received: Decimal,
    pub commitment_date: Option<NaiveDate>,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Commitment {
    pub fn balances(&self) -> CommitmentBalances {
        CommitmentBalances {
            total_commitment: self.total_commitment,
            capital_called: self.capital_called,
            unfunded_commitment: self.unfunded_commitment,
            distributions_received: self.distributions_received,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommitment {
    pub id: Option<String>,
    pub position_id: String,
    pub fund_name: String,
    pub vintage_year: Option<i32>,
    pub total_commitment: Decimal,
    #[serde(default)]
    pub capital_called: Decimal,
    /// Taken as given when supplied (imported statements), otherwise
    /// `total_commitment - capital_called`.
    pub unfunded_commitment: Option<Decimal>,
    #[serde(default)]
    pub distributions_received: Decimal,
    pub commitment_date: Option<NaiveDate>,
    pub currency: String,
    pub notes: Option<String>,
}

impl NewCommitment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fund_name.trim().is_empty() {
            return Err(ValidationError::MissingField("fundName".to_string()));
        }
        if self.position_id.trim().is_empty() {
            return Err(ValidationError::MissingField("positionId".to_string()));
        }
        if self.total_commitment <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Total commitment must be positive".to_string(),
            ));
        }
        if self.capital_called < Decimal::ZERO || self.distributions_received < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Called capital and distributions cannot be negative".to_string(),
            ));
        }
        if self.unfunded_commitment.is_some_and(|u| u < Decimal::ZERO) {
            return Err(ValidationError::InvalidInput(
                "Unfunded commitment cannot be negative".to_string(),
            ));
        }
        if self.currency.len() != 3 {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid currency '{}'",
                self.currency
            )));
        }
        Ok(())
    }

    pub fn resolved_unfunded(&self) -> Decimal {
        self.unfunded_commitment
            .unwrap_or(self.total_commitment - self.capital_called)
    }
}

/// Descriptive fields a user may edit directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentUpdate {
    pub id: String,
    pub fund_name: String,
    pub vintage_year: Option<i32>,
    pub commitment_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// The four money fields, written together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentBalances {
    pub total_commitment: Decimal,
    pub capital_called: Decimal,
    pub unfunded_commitment: Decimal,
    pub distributions_received: Decimal,
}

/// A commitment whose called and unfunded amounts do not add up to the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentDiscrepancy {
    pub commitment_id: String,
    pub fund_name: String,
    pub total_commitment: Decimal,
    pub capital_called: Decimal,
    pub unfunded_commitment: Decimal,
    /// `capital_called + unfunded_commitment - total_commitment`.
    pub difference: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundMultiples {
    /// Distributions to paid-in capital.
    pub dpi: Decimal,
    /// Residual value to paid-in capital.
    pub rvpi: Decimal,
    /// Total value to paid-in capital.
    pub tvpi: Decimal,
    /// Share of the commitment called so far, in percent.
    pub called_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentReconciliation {
    pub commitment_id: String,
    pub recorded_called: Decimal,
    pub transactions_called: Decimal,
    pub capital_call_count: usize,
    /// `recorded_called - transactions_called`.
    pub difference: Decimal,
    pub is_reconciled: bool,
}
