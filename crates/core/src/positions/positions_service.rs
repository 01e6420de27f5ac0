use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::positions_model::{NewPosition, Position, PositionStatus, PositionUpdate};
use super::positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
use crate::entities::EntityRepositoryTrait;
use crate::errors::{Result, ValidationError};
use crate::portfolio::holdings::{ChangeSink, NoOpChangeSink};

pub struct PositionService {
    repository: Arc<dyn PositionRepositoryTrait>,
    entity_repository: Arc<dyn EntityRepositoryTrait>,
    change_sink: Arc<dyn ChangeSink>,
}

impl PositionService {
    pub fn new(
        repository: Arc<dyn PositionRepositoryTrait>,
        entity_repository: Arc<dyn EntityRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            entity_repository,
            change_sink: Arc::new(NoOpChangeSink),
        }
    }

    pub fn with_change_sink(mut self, change_sink: Arc<dyn ChangeSink>) -> Self {
        self.change_sink = change_sink;
        self
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    fn get_positions(&self) -> Result<Vec<Position>> {
        self.repository.list()
    }

    fn get_active_positions(&self) -> Result<Vec<Position>> {
        self.repository.list_active()
    }

    fn get_position(&self, position_id: &str) -> Result<Position> {
        self.repository.get_by_id(position_id)
    }

    async fn create_position(&self, new_position: NewPosition) -> Result<Position> {
        new_position.validate()?;
        self.entity_repository
            .get_by_id(&new_position.entity_id)
            .map_err(|_| {
                ValidationError::InvalidInput(format!(
                    "Entity {} does not exist",
                    new_position.entity_id
                ))
            })?;
        let created = self.repository.create(new_position).await?;
        info!(
            "Created position {} ({}) for entity {}",
            created.name, created.asset_class, created.entity_id
        );
        Ok(created)
    }

    async fn update_position(&self, position_update: PositionUpdate) -> Result<Position> {
        if position_update.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        let updated = self.repository.update(position_update).await?;
        self.change_sink.portfolio_changed();
        Ok(updated)
    }

    async fn exit_position(&self, position_id: &str) -> Result<Position> {
        info!("Marking position {} as exited", position_id);
        let exited = self
            .repository
            .set_status(position_id, PositionStatus::Exited)
            .await?;
        self.change_sink.portfolio_changed();
        Ok(exited)
    }

    async fn reactivate_position(&self, position_id: &str) -> Result<Position> {
        let position = self
            .repository
            .set_status(position_id, PositionStatus::Active)
            .await?;
        self.change_sink.portfolio_changed();
        Ok(position)
    }
}
