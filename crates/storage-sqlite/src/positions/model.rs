//! Database models for positions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{
    decimal_text, now, optional_decimal_text, parse_decimal, parse_enum, parse_optional_decimal,
    to_utc,
};
use wealthdesk_core::portfolio::ledger::LedgerState;
use wealthdesk_core::positions::{
    NewPosition, Position, PositionStatus, PositionUpdate, ValuationUpdate,
};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: String,
    pub sub_class: Option<String>,
    pub currency: String,
    pub quantity: String,
    pub cost_basis: String,
    pub cost_per_unit: String,
    pub current_price: Option<String>,
    pub current_value: String,
    pub last_price_at: Option<NaiveDateTime>,
    pub last_nav: Option<String>,
    pub last_nav_date: Option<NaiveDate>,
    pub status: String,
    pub commitment_id: Option<String>,
    pub acquired_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A freshly created position holds nothing until its first transaction.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::positions)]
pub struct NewPositionDB {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: String,
    pub sub_class: Option<String>,
    pub currency: String,
    pub status: String,
    pub commitment_id: Option<String>,
    pub acquired_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(treat_none_as_null = true)]
pub struct PositionChangesDB {
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: String,
    pub sub_class: Option<String>,
    pub commitment_id: Option<String>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::positions)]
pub struct LedgerChangesDB {
    pub quantity: String,
    pub cost_basis: String,
    pub cost_per_unit: String,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(treat_none_as_null = true)]
pub struct ValuationChangesDB {
    pub current_price: Option<String>,
    pub current_value: String,
    pub last_price_at: Option<NaiveDateTime>,
    pub last_nav: Option<String>,
    pub last_nav_date: Option<NaiveDate>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<PositionDB> for Position {
    type Error = StorageError;

    fn try_from(db: PositionDB) -> Result<Self, Self::Error> {
        Ok(Position {
            asset_class: parse_enum(&db.asset_class, "asset_class")?,
            status: parse_enum(&db.status, "status")?,
            quantity: parse_decimal(&db.quantity, "quantity"),
            cost_basis: parse_decimal(&db.cost_basis, "cost_basis"),
            cost_per_unit: parse_decimal(&db.cost_per_unit, "cost_per_unit"),
            current_price: parse_optional_decimal(db.current_price.as_deref(), "current_price"),
            current_value: parse_decimal(&db.current_value, "current_value"),
            last_price_at: db.last_price_at.map(to_utc),
            last_nav: parse_optional_decimal(db.last_nav.as_deref(), "last_nav"),
            last_nav_date: db.last_nav_date,
            id: db.id,
            entity_id: db.entity_id,
            name: db.name,
            symbol: db.symbol,
            sub_class: db.sub_class,
            currency: db.currency,
            commitment_id: db.commitment_id,
            acquired_on: db.acquired_on,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl NewPositionDB {
    pub fn from_domain(new_position: NewPosition, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            entity_id: new_position.entity_id,
            name: new_position.name,
            symbol: new_position.symbol,
            asset_class: new_position.asset_class.display_name().to_string(),
            sub_class: new_position.sub_class,
            currency: new_position.currency,
            status: PositionStatus::Active.as_str().to_string(),
            commitment_id: new_position.commitment_id,
            acquired_on: new_position.acquired_on,
            notes: new_position.notes,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl From<PositionUpdate> for PositionChangesDB {
    fn from(update: PositionUpdate) -> Self {
        Self {
            name: update.name,
            symbol: update.symbol,
            asset_class: update.asset_class.display_name().to_string(),
            sub_class: update.sub_class,
            commitment_id: update.commitment_id,
            notes: update.notes,
            updated_at: now(),
        }
    }
}

impl From<&LedgerState> for LedgerChangesDB {
    fn from(state: &LedgerState) -> Self {
        Self {
            quantity: decimal_text(state.quantity),
            cost_basis: decimal_text(state.cost_basis),
            cost_per_unit: decimal_text(state.cost_per_unit),
            updated_at: now(),
        }
    }
}

impl From<ValuationUpdate> for ValuationChangesDB {
    fn from(update: ValuationUpdate) -> Self {
        Self {
            current_price: optional_decimal_text(update.current_price),
            current_value: decimal_text(update.current_value),
            last_price_at: update.last_price_at.map(|t| t.naive_utc()),
            last_nav: optional_decimal_text(update.last_nav),
            last_nav_date: update.last_nav_date,
            updated_at: now(),
        }
    }
}
