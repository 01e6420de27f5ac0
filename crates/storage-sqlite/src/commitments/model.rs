use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::utils::{decimal_text, now, parse_decimal};
use wealthdesk_core::commitments::{
    Commitment, CommitmentBalances, CommitmentUpdate, NewCommitment,
};

#[derive(Queryable, Identifiable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::commitments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CommitmentDB {
    pub id: String,
    pub position_id: String,
    pub fund_name: String,
    pub vintage_year: Option<i32>,
    pub total_commitment: String,
    pub capital_called: String,
    pub unfunded_commitment: String,
    pub distributions_received: String,
    pub commitment_date: Option<NaiveDate>,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::commitments)]
#[diesel(treat_none_as_null = true)]
pub struct CommitmentChangesDB {
    pub fund_name: String,
    pub vintage_year: Option<i32>,
    pub commitment_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::commitments)]
pub struct BalanceChangesDB {
    pub total_commitment: String,
    pub capital_called: String,
    pub unfunded_commitment: String,
    pub distributions_received: String,
    pub updated_at: NaiveDateTime,
}

impl From<CommitmentDB> for Commitment {
    fn from(db: CommitmentDB) -> Self {
        Commitment {
            total_commitment: parse_decimal(&db.total_commitment, "total_commitment"),
            capital_called: parse_decimal(&db.capital_called, "capital_called"),
            unfunded_commitment: parse_decimal(&db.unfunded_commitment, "unfunded_commitment"),
            distributions_received: parse_decimal(
                &db.distributions_received,
                "distributions_received",
            ),
            id: db.id,
            position_id: db.position_id,
            fund_name: db.fund_name,
            vintage_year: db.vintage_year,
            commitment_date: db.commitment_date,
            currency: db.currency,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl CommitmentDB {
    pub fn from_domain(commitment: NewCommitment, id: String) -> Self {
        let timestamp = now();
        let unfunded = commitment.resolved_unfunded();
        Self {
            id,
            position_id: commitment.position_id,
            fund_name: commitment.fund_name.trim().to_string(),
            vintage_year: commitment.vintage_year,
            total_commitment: decimal_text(commitment.total_commitment),
            capital_called: decimal_text(commitment.capital_called),
            unfunded_commitment: decimal_text(unfunded),
            distributions_received: decimal_text(commitment.distributions_received),
            commitment_date: commitment.commitment_date,
            currency: commitment.currency,
            notes: commitment.notes,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl From<CommitmentUpdate> for CommitmentChangesDB {
    fn from(update: CommitmentUpdate) -> Self {
        Self {
            fund_name: update.fund_name.trim().to_string(),
            vintage_year: update.vintage_year,
            commitment_date: update.commitment_date,
            notes: update.notes,
            updated_at: now(),
        }
    }
}

impl From<&CommitmentBalances> for BalanceChangesDB {
    fn from(balances: &CommitmentBalances) -> Self {
        Self {
            total_commitment: decimal_text(balances.total_commitment),
            capital_called: decimal_text(balances.capital_called),
            unfunded_commitment: decimal_text(balances.unfunded_commitment),
            distributions_received: decimal_text(balances.distributions_received),
            updated_at: now(),
        }
    }
}
