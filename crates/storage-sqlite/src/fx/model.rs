use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{decimal_text, parse_decimal, to_utc};
use wealthdesk_core::fx::{ExchangeRate, NewExchangeRate};

#[derive(Queryable, Identifiable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: String,
    pub as_of: NaiveDateTime,
    pub source: String,
}

impl From<ExchangeRateDB> for ExchangeRate {
    fn from(db: ExchangeRateDB) -> Self {
        ExchangeRate {
            rate: parse_decimal(&db.rate, "rate"),
            as_of: to_utc(db.as_of),
            id: db.id,
            from_currency: db.from_currency,
            to_currency: db.to_currency,
            source: db.source,
        }
    }
}

impl ExchangeRateDB {
    /// Currency codes are stored upper-case so pair lookups are exact.
    pub fn from_domain(rate: NewExchangeRate, id: String) -> Self {
        Self {
            id,
            from_currency: rate.from_currency.to_uppercase(),
            to_currency: rate.to_currency.to_uppercase(),
            rate: decimal_text(rate.rate),
            as_of: rate.as_of.naive_utc(),
            source: rate.source,
        }
    }
}
