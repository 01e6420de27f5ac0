use async_trait::async_trait;

use super::entities_model::{Entity, EntityUpdate, NewEntity};
use crate::errors::Result;

/// Trait defining the contract for Entity repository operations.
#[async_trait]
pub trait EntityRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Entity>>;
    fn get_by_id(&self, entity_id: &str) -> Result<Entity>;
    /// Number of positions and risks that point at the entity.
    fn count_references(&self, entity_id: &str) -> Result<i64>;
    async fn create(&self, new_entity: NewEntity) -> Result<Entity>;
    async fn update(&self, entity_update: EntityUpdate) -> Result<Entity>;
    async fn delete(&self, entity_id: &str) -> Result<usize>;
}

/// Trait defining the contract for Entity service operations.
#[async_trait]
pub trait EntityServiceTrait: Send + Sync {
    fn list_entities(&self) -> Result<Vec<Entity>>;
    fn get_entity(&self, entity_id: &str) -> Result<Entity>;
    /// Ids of the entity and everything below it in the ownership tree.
    fn descendants(&self, entity_id: &str) -> Result<Vec<String>>;
    async fn create_entity(&self, new_entity: NewEntity) -> Result<Entity>;
    async fn update_entity(&self, entity_update: EntityUpdate) -> Result<Entity>;
    async fn delete_entity(&self, entity_id: &str) -> Result<()>;
}
