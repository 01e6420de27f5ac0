//! Temp-file databases for repository tests.

use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{create_pool, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::entities::EntityRepository;
use crate::positions::PositionRepository;
use wealthdesk_core::entities::{EntityRepositoryTrait, EntityType, NewEntity};
use wealthdesk_core::positions::{AssetClass, NewPosition, PositionRepositoryTrait};

/// Keeps the temp directory alive for as long as the pool is used.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

/// Must be called from inside a tokio runtime: the writer is a spawned task.
pub fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

pub async fn seed_entity(db: &TestDb, id: &str) {
    EntityRepository::new(Arc::clone(&db.pool), db.writer.clone())
        .create(NewEntity {
            id: Some(id.to_string()),
            name: format!("Entity {}", id),
            entity_type: EntityType::Holding,
            base_currency: "CAD".to_string(),
            parent_id: None,
            notes: None,
        })
        .await
        .expect("Failed to seed entity");
}

pub fn new_position(id: &str, entity_id: &str, asset_class: AssetClass) -> NewPosition {
    NewPosition {
        id: Some(id.to_string()),
        entity_id: entity_id.to_string(),
        name: format!("Position {}", id),
        symbol: None,
        asset_class,
        sub_class: None,
        currency: "CAD".to_string(),
        commitment_id: None,
        acquired_on: None,
        notes: None,
    }
}

pub async fn seed_position(db: &TestDb, id: &str, entity_id: &str, asset_class: AssetClass) {
    PositionRepository::new(Arc::clone(&db.pool), db.writer.clone())
        .create(new_position(id, entity_id, asset_class))
        .await
        .expect("Failed to seed position");
}
