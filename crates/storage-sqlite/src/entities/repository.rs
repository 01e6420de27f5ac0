use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{EntityChangesDB, EntityDB, NewEntityDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::{entities, positions, risks};
use wealthdesk_core::entities::{Entity, EntityRepositoryTrait, EntityUpdate, NewEntity};
use wealthdesk_core::errors::{Error, Result};

pub struct EntityRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl EntityRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_entity(conn: &mut SqliteConnection, entity_id: &str) -> Result<Entity> {
    let row = entities::table
        .find(entity_id)
        .select(EntityDB::as_select())
        .first(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| not_found("entity", entity_id))?;
    Ok(Entity::try_from(row)?)
}

#[async_trait]
impl EntityRepositoryTrait for EntityRepository {
    fn list(&self) -> Result<Vec<Entity>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<EntityDB> = entities::table
            .order(entities::name.asc())
            .select(EntityDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Entity::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_by_id(&self, entity_id: &str) -> Result<Entity> {
        let mut conn = get_connection(&self.pool)?;
        load_entity(&mut conn, entity_id)
    }

    fn count_references(&self, entity_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let position_refs: i64 = positions::table
            .filter(positions::entity_id.eq(entity_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        let risk_refs: i64 = risks::table
            .filter(risks::entity_id.eq(entity_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(position_refs + risk_refs)
    }

    async fn create(&self, new_entity: NewEntity) -> Result<Entity> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Entity> {
                let id = new_entity
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = NewEntityDB::from_domain(new_entity, id.clone());
                diesel::insert_into(entities::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_entity(conn, &id)
            })
            .await
    }

    async fn update(&self, entity_update: EntityUpdate) -> Result<Entity> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Entity> {
                let id = entity_update.id.clone();
                let changes = EntityChangesDB::from(entity_update);
                let updated = diesel::update(entities::table.find(&id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(not_found("entity", &id));
                }
                load_entity(conn, &id)
            })
            .await
    }

    async fn delete(&self, entity_id: &str) -> Result<usize> {
        let entity_id = entity_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(entities::table.find(entity_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
