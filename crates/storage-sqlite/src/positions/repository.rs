use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{
    LedgerChangesDB, NewPositionDB, PositionChangesDB, PositionDB, ValuationChangesDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::positions;
use crate::utils::now;
use wealthdesk_core::errors::{Error, Result};
use wealthdesk_core::portfolio::ledger::LedgerState;
use wealthdesk_core::positions::{
    NewPosition, Position, PositionRepositoryTrait, PositionStatus, PositionUpdate,
    ValuationUpdate,
};

pub struct PositionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PositionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_positions(rows: Vec<PositionDB>) -> Result<Vec<Position>> {
    rows.into_iter()
        .map(|row| Position::try_from(row).map_err(Error::from))
        .collect()
}

pub(crate) fn load_position(conn: &mut SqliteConnection, position_id: &str) -> Result<Position> {
    let row = positions::table
        .find(position_id)
        .select(PositionDB::as_select())
        .first(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| not_found("position", position_id))?;
    Ok(Position::try_from(row)?)
}

fn ensure_updated(updated: usize, position_id: &str) -> Result<()> {
    if updated == 0 {
        return Err(not_found("position", position_id));
    }
    Ok(())
}

#[async_trait]
impl PositionRepositoryTrait for PositionRepository {
    fn list(&self) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<PositionDB> = positions::table
            .order(positions::name.asc())
            .select(PositionDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        to_positions(rows)
    }

    fn list_active(&self) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<PositionDB> = positions::table
            .filter(positions::status.eq(PositionStatus::Active.as_str()))
            .order(positions::name.asc())
            .select(PositionDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        to_positions(rows)
    }

    fn list_by_entity(&self, entity_id: &str) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<PositionDB> = positions::table
            .filter(positions::entity_id.eq(entity_id))
            .order(positions::name.asc())
            .select(PositionDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        to_positions(rows)
    }

    fn get_by_id(&self, position_id: &str) -> Result<Position> {
        let mut conn = get_connection(&self.pool)?;
        load_position(&mut conn, position_id)
    }

    async fn create(&self, new_position: NewPosition) -> Result<Position> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let id = new_position
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = NewPositionDB::from_domain(new_position, id.clone());
                diesel::insert_into(positions::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_position(conn, &id)
            })
            .await
    }

    async fn update(&self, position_update: PositionUpdate) -> Result<Position> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let id = position_update.id.clone();
                let changes = PositionChangesDB::from(position_update);
                let updated = diesel::update(positions::table.find(&id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(updated, &id)?;
                load_position(conn, &id)
            })
            .await
    }

    async fn update_ledger(&self, position_id: &str, state: LedgerState) -> Result<Position> {
        let id = position_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let updated = diesel::update(positions::table.find(&id))
                    .set(&LedgerChangesDB::from(&state))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(updated, &id)?;
                // The first acquisition date only fills a gap, it never
                // overwrites a date entered by hand.
                if let Some(first) = state.first_acquired_on {
                    diesel::update(
                        positions::table
                            .find(&id)
                            .filter(positions::acquired_on.is_null()),
                    )
                    .set(positions::acquired_on.eq(first))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                load_position(conn, &id)
            })
            .await
    }

    async fn update_valuation(
        &self,
        position_id: &str,
        update: ValuationUpdate,
    ) -> Result<Position> {
        let id = position_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let updated = diesel::update(positions::table.find(&id))
                    .set(&ValuationChangesDB::from(update))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(updated, &id)?;
                load_position(conn, &id)
            })
            .await
    }

    async fn set_status(&self, position_id: &str, status: PositionStatus) -> Result<Position> {
        let id = position_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let updated = diesel::update(positions::table.find(&id))
                    .set((
                        positions::status.eq(status.as_str()),
                        positions::updated_at.eq(now()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(updated, &id)?;
                load_position(conn, &id)
            })
            .await
    }
}
