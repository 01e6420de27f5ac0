use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{BalanceChangesDB, CommitmentChangesDB, CommitmentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::commitments;
use wealthdesk_core::commitments::{
    Commitment, CommitmentBalances, CommitmentRepositoryTrait, CommitmentUpdate, NewCommitment,
};
use wealthdesk_core::errors::Result;

pub struct CommitmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CommitmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_commitment(conn: &mut SqliteConnection, commitment_id: &str) -> Result<Commitment> {
    commitments::table
        .find(commitment_id)
        .select(CommitmentDB::as_select())
        .first(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Commitment::from)
        .ok_or_else(|| not_found("commitment", commitment_id))
}

fn ensure_updated(updated: usize, commitment_id: &str) -> Result<()> {
    if updated == 0 {
        return Err(not_found("commitment", commitment_id));
    }
    Ok(())
}

#[async_trait]
impl CommitmentRepositoryTrait for CommitmentRepository {
    fn list(&self) -> Result<Vec<Commitment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<CommitmentDB> = commitments::table
            .order(commitments::fund_name.asc())
            .select(CommitmentDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Commitment::from).collect())
    }

    fn get_by_id(&self, commitment_id: &str) -> Result<Commitment> {
        let mut conn = get_connection(&self.pool)?;
        load_commitment(&mut conn, commitment_id)
    }

    fn get_by_position(&self, position_id: &str) -> Result<Option<Commitment>> {
        let mut conn = get_connection(&self.pool)?;
        let row = commitments::table
            .filter(commitments::position_id.eq(position_id))
            .select(CommitmentDB::as_select())
            .first(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Commitment::from))
    }

    async fn create(&self, new_commitment: NewCommitment) -> Result<Commitment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Commitment> {
                let id = new_commitment
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = CommitmentDB::from_domain(new_commitment, id.clone());
                diesel::insert_into(commitments::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_commitment(conn, &id)
            })
            .await
    }

    async fn update(&self, commitment_update: CommitmentUpdate) -> Result<Commitment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Commitment> {
                let id = commitment_update.id.clone();
                let changes = CommitmentChangesDB::from(commitment_update);
                let updated = diesel::update(commitments::table.find(&id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(updated, &id)?;
                load_commitment(conn, &id)
            })
            .await
    }

    async fn update_balances(
        &self,
        commitment_id: &str,
        balances: CommitmentBalances,
    ) -> Result<Commitment> {
        let id = commitment_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Commitment> {
                let updated = diesel::update(commitments::table.find(&id))
                    .set(&BalanceChangesDB::from(&balances))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(updated, &id)?;
                load_commitment(conn, &id)
            })
            .await
    }

    async fn delete(&self, commitment_id: &str) -> Result<usize> {
        let id = commitment_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(commitments::table.find(id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
