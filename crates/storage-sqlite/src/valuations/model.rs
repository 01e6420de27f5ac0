use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{decimal_text, now, parse_decimal, parse_enum};
use wealthdesk_core::portfolio::valuation::{NewValuation, Valuation};

#[derive(Queryable, Identifiable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::valuations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ValuationDB {
    pub id: String,
    pub position_id: String,
    pub valuation_date: NaiveDate,
    pub value_per_unit: String,
    pub total_value: String,
    pub method: String,
    pub confidence: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ValuationDB> for Valuation {
    type Error = StorageError;

    fn try_from(db: ValuationDB) -> Result<Self, Self::Error> {
        Ok(Valuation {
            method: parse_enum(&db.method, "method")?,
            confidence: parse_enum(&db.confidence, "confidence")?,
            value_per_unit: parse_decimal(&db.value_per_unit, "value_per_unit"),
            total_value: parse_decimal(&db.total_value, "total_value"),
            date: db.valuation_date,
            id: db.id,
            position_id: db.position_id,
            notes: db.notes,
            created_at: db.created_at,
        })
    }
}

impl ValuationDB {
    pub fn from_domain(valuation: NewValuation, id: String) -> Self {
        Self {
            id,
            position_id: valuation.position_id,
            valuation_date: valuation.date,
            value_per_unit: decimal_text(valuation.value_per_unit),
            total_value: decimal_text(valuation.total_value),
            method: valuation.method.as_str().to_string(),
            confidence: valuation.confidence.as_str().to_string(),
            notes: valuation.notes,
            created_at: now(),
        }
    }
}
