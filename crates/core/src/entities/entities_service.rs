use async_trait::async_trait;
use log::{debug, info};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use super::entities_model::{Entity, EntityUpdate, NewEntity};
use super::entities_traits::{EntityRepositoryTrait, EntityServiceTrait};
use crate::errors::{Error, Result, ValidationError};

pub struct EntityService {
    repository: Arc<dyn EntityRepositoryTrait>,
}

impl EntityService {
    pub fn new(repository: Arc<dyn EntityRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_unique_name(&self, entities: &[Entity], name: &str, own_id: Option<&str>) -> Result<()> {
        let taken = entities.iter().any(|e| {
            e.name.trim().eq_ignore_ascii_case(name.trim()) && Some(e.id.as_str()) != own_id
        });
        if taken {
            return Err(Error::ConstraintViolation(format!(
                "An entity named '{}' already exists",
                name.trim()
            )));
        }
        Ok(())
    }

    /// Rejects a parent that is missing, is the entity itself, or sits below it.
    fn ensure_valid_parent(
        &self,
        entities: &[Entity],
        entity_id: Option<&str>,
        parent_id: &str,
    ) -> Result<()> {
        let parents: HashMap<&str, Option<&str>> = entities
            .iter()
            .map(|e| (e.id.as_str(), e.parent_id.as_deref()))
            .collect();

        if !parents.contains_key(parent_id) {
            return Err(ValidationError::InvalidInput(format!(
                "Parent entity {} does not exist",
                parent_id
            ))
            .into());
        }

        let Some(entity_id) = entity_id else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        let mut cursor = Some(parent_id);
        while let Some(current) = cursor {
            if current == entity_id {
                return Err(Error::ConstraintViolation(format!(
                    "Entity {} cannot be its own ancestor",
                    entity_id
                )));
            }
            if !seen.insert(current) {
                break;
            }
            cursor = parents.get(current).copied().flatten();
        }
        Ok(())
    }
}

#[async_trait]
impl EntityServiceTrait for EntityService {
    fn list_entities(&self) -> Result<Vec<Entity>> {
        self.repository.list()
    }

    fn get_entity(&self, entity_id: &str) -> Result<Entity> {
        self.repository.get_by_id(entity_id)
    }

    fn descendants(&self, entity_id: &str) -> Result<Vec<String>> {
        let entities = self.repository.list()?;
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for entity in &entities {
            if let Some(parent) = entity.parent_id.as_deref() {
                children.entry(parent).or_default().push(entity.id.as_str());
            }
        }

        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([entity_id]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            result.push(current.to_string());
            if let Some(kids) = children.get(current) {
                queue.extend(kids.iter().copied());
            }
        }
        Ok(result)
    }

    async fn create_entity(&self, new_entity: NewEntity) -> Result<Entity> {
        new_entity.validate()?;
        let entities = self.repository.list()?;
        self.ensure_unique_name(&entities, &new_entity.name, None)?;
        if let Some(parent_id) = new_entity.parent_id.as_deref() {
            self.ensure_valid_parent(&entities, new_entity.id.as_deref(), parent_id)?;
        }
        let created = self.repository.create(new_entity).await?;
        info!("Created entity {} ({})", created.name, created.id);
        Ok(created)
    }

    async fn update_entity(&self, entity_update: EntityUpdate) -> Result<Entity> {
        entity_update.validate()?;
        let entities = self.repository.list()?;
        if !entities.iter().any(|e| e.id == entity_update.id) {
            return Err(Error::Repository(format!(
                "Entity {} not found",
                entity_update.id
            )));
        }
        self.ensure_unique_name(&entities, &entity_update.name, Some(&entity_update.id))?;
        if let Some(parent_id) = entity_update.parent_id.as_deref() {
            self.ensure_valid_parent(&entities, Some(&entity_update.id), parent_id)?;
        }
        debug!("Updating entity {}", entity_update.id);
        self.repository.update(entity_update).await
    }

    async fn delete_entity(&self, entity_id: &str) -> Result<()> {
        let references = self.repository.count_references(entity_id)?;
        if references > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Entity {} is still referenced by {} positions or risks",
                entity_id, references
            )));
        }
        let has_children = self
            .repository
            .list()?
            .iter()
            .any(|e| e.parent_id.as_deref() == Some(entity_id));
        if has_children {
            return Err(Error::ConstraintViolation(format!(
                "Entity {} still has child entities",
                entity_id
            )));
        }
        self.repository.delete(entity_id).await?;
        info!("Deleted entity {}", entity_id);
        Ok(())
    }
}
