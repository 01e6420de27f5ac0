use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::ValuationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::valuations;
use wealthdesk_core::errors::{Error, Result};
use wealthdesk_core::portfolio::valuation::{NewValuation, Valuation, ValuationRepositoryTrait};

pub struct ValuationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ValuationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ValuationRepositoryTrait for ValuationRepository {
    fn list_for_position(&self, position_id: &str) -> Result<Vec<Valuation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<ValuationDB> = valuations::table
            .filter(valuations::position_id.eq(position_id))
            .order((valuations::valuation_date.desc(), valuations::created_at.desc()))
            .select(ValuationDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Valuation::try_from(row).map_err(Error::from))
            .collect()
    }

    fn latest_for_position(&self, position_id: &str) -> Result<Option<Valuation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = valuations::table
            .filter(valuations::position_id.eq(position_id))
            .order((valuations::valuation_date.desc(), valuations::created_at.desc()))
            .select(ValuationDB::as_select())
            .first(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Valuation::try_from).transpose()?)
    }

    async fn create(&self, new_valuation: NewValuation) -> Result<Valuation> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Valuation> {
                let id = Uuid::new_v4().to_string();
                let row = ValuationDB::from_domain(new_valuation, id.clone());
                diesel::insert_into(valuations::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let stored = valuations::table
                    .find(&id)
                    .select(ValuationDB::as_select())
                    .first(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| not_found("valuation", &id))?;
                Ok(Valuation::try_from(stored)?)
            })
            .await
    }

    async fn delete(&self, valuation_id: &str) -> Result<usize> {
        let id = valuation_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(valuations::table.find(id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_entity, seed_position, test_db};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use wealthdesk_core::portfolio::valuation::{Confidence, ValuationMethod};
    use wealthdesk_core::positions::AssetClass;

    fn mark(day: u32, total: rust_decimal::Decimal) -> NewValuation {
        NewValuation {
            position_id: "p1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            total_value: total,
            value_per_unit: total,
            method: ValuationMethod::FundStatement,
            confidence: Confidence::Medium,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_latest_mark_is_by_valuation_date() {
        let db = test_db();
        seed_entity(&db, "e1").await;
        seed_position(&db, "p1", "e1", AssetClass::Fund).await;
        let repo = ValuationRepository::new(Arc::clone(&db.pool), db.writer.clone());

        repo.create(mark(31, dec!(1250000))).await.unwrap();
        repo.create(mark(1, dec!(1100000))).await.unwrap();

        let latest = repo.latest_for_position("p1").unwrap().unwrap();
        assert_eq!(latest.total_value, dec!(1250000));
        assert_eq!(latest.method, ValuationMethod::FundStatement);
        assert_eq!(latest.confidence, Confidence::Medium);
        let dates: Vec<u32> = repo
            .list_for_position("p1")
            .unwrap()
            .iter()
            .map(|v| chrono::Datelike::day(&v.date))
            .collect();
        assert_eq!(dates, vec![31, 1]);
    }

    #[tokio::test]
    async fn test_no_marks_is_none() {
        let db = test_db();
        let repo = ValuationRepository::new(Arc::clone(&db.pool), db.writer.clone());

        assert!(repo.latest_for_position("p1").unwrap().is_none());
        assert_eq!(repo.delete("missing").await.unwrap(), 0);
    }
}
