use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::model::ExchangeRateDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::exchange_rates;
use wealthdesk_core::errors::Result;
use wealthdesk_core::fx::{ExchangeRate, FxRepositoryTrait, NewExchangeRate};

#[derive(Clone)]
pub struct FxRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FxRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn load_newest_first(&self) -> Result<Vec<ExchangeRateDB>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<ExchangeRateDB> = exchange_rates::table
            .order((
                exchange_rates::from_currency.asc(),
                exchange_rates::to_currency.asc(),
                exchange_rates::as_of.desc(),
            ))
            .select(ExchangeRateDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows)
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRepository {
    fn get_latest_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        let mut seen = HashSet::new();
        Ok(self
            .load_newest_first()?
            .into_iter()
            .filter(|row| seen.insert((row.from_currency.clone(), row.to_currency.clone())))
            .map(ExchangeRate::from)
            .collect())
    }

    fn get_historical_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        Ok(self
            .load_newest_first()?
            .into_iter()
            .map(ExchangeRate::from)
            .collect())
    }

    fn get_latest_exchange_rate(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let row = exchange_rates::table
            .filter(exchange_rates::from_currency.eq(from.to_uppercase()))
            .filter(exchange_rates::to_currency.eq(to.to_uppercase()))
            .order(exchange_rates::as_of.desc())
            .select(ExchangeRateDB::as_select())
            .first(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(ExchangeRate::from))
    }

    async fn save_exchange_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ExchangeRate> {
                let row = ExchangeRateDB::from_domain(rate, Uuid::new_v4().to_string());
                diesel::insert_into(exchange_rates::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(ExchangeRate::from(row))
            })
            .await
    }

    async fn delete_exchange_rate(&self, rate_id: &str) -> Result<()> {
        let id = rate_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let deleted = diesel::delete(exchange_rates::table.find(&id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(not_found("exchange rate", &id));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use wealthdesk_core::errors::{DatabaseError, Error};

    fn rate(from: &str, to: &str, value: Decimal, day: u32) -> NewExchangeRate {
        NewExchangeRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate: value,
            as_of: Utc.with_ymd_and_hms(2024, 5, day, 16, 0, 0).unwrap(),
            source: "MANUAL".to_string(),
        }
    }

    #[tokio::test]
    async fn test_latest_keeps_newest_rate_per_pair() {
        let db = test_db();
        let repo = FxRepository::new(Arc::clone(&db.pool), db.writer.clone());
        repo.save_exchange_rate(rate("USD", "CAD", dec!(1.35), 1))
            .await
            .unwrap();
        repo.save_exchange_rate(rate("usd", "cad", dec!(1.37), 2))
            .await
            .unwrap();
        repo.save_exchange_rate(rate("EUR", "CAD", dec!(1.48), 1))
            .await
            .unwrap();

        let latest = repo.get_latest_exchange_rates().unwrap();
        assert_eq!(latest.len(), 2);
        let usd = latest
            .iter()
            .find(|r| r.from_currency == "USD")
            .unwrap();
        assert_eq!(usd.rate, dec!(1.37));
        assert_eq!(repo.get_historical_exchange_rates().unwrap().len(), 3);
        assert_eq!(
            repo.get_latest_exchange_rate("usd", "CAD")
                .unwrap()
                .map(|r| r.rate),
            Some(dec!(1.37))
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_rate_is_not_found() {
        let db = test_db();
        let repo = FxRepository::new(Arc::clone(&db.pool), db.writer.clone());

        let result = repo.delete_exchange_rate("nope").await;

        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
        assert!(repo.get_latest_exchange_rate("GBP", "CAD").unwrap().is_none());
    }
}
