use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{NewTransactionDB, TransactionChangesDB, TransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::transactions;
use wealthdesk_core::errors::{Error, Result};
use wealthdesk_core::transactions::{
    NewTransaction, Transaction, TransactionRepositoryTrait, TransactionUpdate,
};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_transaction(conn: &mut SqliteConnection, transaction_id: &str) -> Result<Transaction> {
    let row = transactions::table
        .find(transaction_id)
        .select(TransactionDB::as_select())
        .first(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| not_found("transaction", transaction_id))?;
    Ok(Transaction::try_from(row)?)
}

fn to_transactions(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter()
        .map(|row| Transaction::try_from(row).map_err(Error::from))
        .collect()
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        load_transaction(&mut conn, transaction_id)
    }

    fn list_for_position(&self, position_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        // Same-day rows keep their entry order so replays are deterministic.
        let rows: Vec<TransactionDB> = transactions::table
            .filter(transactions::position_id.eq(position_id))
            .order((
                transactions::transaction_date.asc(),
                transactions::created_at.asc(),
                transactions::id.asc(),
            ))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        to_transactions(rows)
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<TransactionDB> = transactions::table
            .order((
                transactions::transaction_date.asc(),
                transactions::created_at.asc(),
            ))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        to_transactions(rows)
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let id = new_transaction
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = NewTransactionDB::from_domain(new_transaction, id.clone());
                diesel::insert_into(transactions::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_transaction(conn, &id)
            })
            .await
    }

    async fn update(&self, transaction_update: TransactionUpdate) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let id = transaction_update.id.clone();
                let changes = TransactionChangesDB::from(transaction_update);
                let updated = diesel::update(transactions::table.find(&id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(not_found("transaction", &id));
                }
                load_transaction(conn, &id)
            })
            .await
    }

    async fn delete(&self, transaction_id: &str) -> Result<Transaction> {
        let id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let removed = load_transaction(conn, &id)?;
                diesel::delete(transactions::table.find(&id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(removed)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_entity, seed_position, test_db};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use wealthdesk_core::positions::AssetClass;
    use wealthdesk_core::transactions::TransactionType;

    fn new_tx(id: &str, transaction_type: TransactionType, day: u32) -> NewTransaction {
        NewTransaction {
            id: Some(id.to_string()),
            position_id: "p1".to_string(),
            transaction_type,
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            quantity: dec!(10),
            price_per_unit: Some(dec!(12.5)),
            total_amount: dec!(125),
            currency: "CAD".to_string(),
            fees: Decimal::ZERO,
            notes: None,
        }
    }

    async fn repo() -> (TransactionRepository, crate::test_support::TestDb) {
        let db = test_db();
        seed_entity(&db, "e1").await;
        seed_position(&db, "p1", "e1", AssetClass::PublicEquities).await;
        (
            TransactionRepository::new(Arc::clone(&db.pool), db.writer.clone()),
            db,
        )
    }

    #[tokio::test]
    async fn test_position_history_is_date_ordered() {
        let (repo, _db) = repo().await;
        repo.create(new_tx("t-late", TransactionType::Sell, 20))
            .await
            .unwrap();
        repo.create(new_tx("t-early", TransactionType::Buy, 1))
            .await
            .unwrap();
        repo.create(new_tx("t-call", TransactionType::CapitalCall, 10))
            .await
            .unwrap();

        let ids: Vec<String> = repo
            .list_for_position("p1")
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t-early", "t-call", "t-late"]);
        assert_eq!(
            repo.get_by_id("t-call").unwrap().transaction_type,
            TransactionType::CapitalCall
        );
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let (repo, _db) = repo().await;
        repo.create(new_tx("t1", TransactionType::Buy, 1)).await.unwrap();

        let removed = repo.delete("t1").await.unwrap();

        assert_eq!(removed.total_amount, dec!(125));
        assert!(repo.list_for_position("p1").unwrap().is_empty());
        assert!(repo.delete("t1").await.is_err());
    }

    #[tokio::test]
    async fn test_update_clears_price_per_unit() {
        let (repo, _db) = repo().await;
        repo.create(new_tx("t1", TransactionType::Buy, 1)).await.unwrap();

        let updated = repo
            .update(TransactionUpdate {
                id: "t1".to_string(),
                transaction_type: TransactionType::TransferIn,
                date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                quantity: dec!(4),
                price_per_unit: None,
                total_amount: dec!(60),
                currency: "CAD".to_string(),
                fees: dec!(1.5),
                notes: Some("moved from broker".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.transaction_type, TransactionType::TransferIn);
        assert!(updated.price_per_unit.is_none());
        assert_eq!(updated.fees, dec!(1.5));
    }
}
