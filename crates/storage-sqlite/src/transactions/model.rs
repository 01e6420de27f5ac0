//! Database models for transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{decimal_text, now, optional_decimal_text, parse_decimal, parse_enum, parse_optional_decimal};
use wealthdesk_core::transactions::{NewTransaction, Transaction, TransactionUpdate};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub position_id: String,
    pub transaction_type: String,
    pub transaction_date: NaiveDate,
    pub quantity: String,
    pub price_per_unit: Option<String>,
    pub total_amount: String,
    pub currency: String,
    pub fees: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub id: String,
    pub position_id: String,
    pub transaction_type: String,
    pub transaction_date: NaiveDate,
    pub quantity: String,
    pub price_per_unit: Option<String>,
    pub total_amount: String,
    pub currency: String,
    pub fees: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// The owning position and creation time never change.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(treat_none_as_null = true)]
pub struct TransactionChangesDB {
    pub transaction_type: String,
    pub transaction_date: NaiveDate,
    pub quantity: String,
    pub price_per_unit: Option<String>,
    pub total_amount: String,
    pub currency: String,
    pub fees: String,
    pub notes: Option<String>,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Transaction {
            transaction_type: parse_enum(&db.transaction_type, "transaction_type")?,
            date: db.transaction_date,
            quantity: parse_decimal(&db.quantity, "quantity"),
            price_per_unit: parse_optional_decimal(db.price_per_unit.as_deref(), "price_per_unit"),
            total_amount: parse_decimal(&db.total_amount, "total_amount"),
            fees: parse_decimal(&db.fees, "fees"),
            id: db.id,
            position_id: db.position_id,
            currency: db.currency,
            notes: db.notes,
            created_at: db.created_at,
        })
    }
}

impl NewTransactionDB {
    pub fn from_domain(tx: NewTransaction, id: String) -> Self {
        Self {
            id,
            position_id: tx.position_id,
            transaction_type: tx.transaction_type.as_str().to_string(),
            transaction_date: tx.date,
            quantity: decimal_text(tx.quantity),
            price_per_unit: optional_decimal_text(tx.price_per_unit),
            total_amount: decimal_text(tx.total_amount),
            currency: tx.currency,
            fees: decimal_text(tx.fees),
            notes: tx.notes,
            created_at: now(),
        }
    }
}

impl From<TransactionUpdate> for TransactionChangesDB {
    fn from(tx: TransactionUpdate) -> Self {
        Self {
            transaction_type: tx.transaction_type.as_str().to_string(),
            transaction_date: tx.date,
            quantity: decimal_text(tx.quantity),
            price_per_unit: optional_decimal_text(tx.price_per_unit),
            total_amount: decimal_text(tx.total_amount),
            currency: tx.currency,
            fees: decimal_text(tx.fees),
            notes: tx.notes,
        }
    }
}
