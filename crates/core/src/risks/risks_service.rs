use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::risks_calculator::{
    category_distribution, changed_fields, filter_risks, review_schedule, risk_matrix,
    risk_score, risk_summary, MATRIX_SIZE,
};
use super::risks_model::{
    CategoryStats, NewRisk, Risk, RiskCategory, RiskFilter, RiskInput, RiskSummary,
    ReviewSchedule,
};
use super::risks_traits::{RiskRepositoryTrait, RiskServiceTrait};
use crate::entities::EntityRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::positions::PositionRepositoryTrait;

pub struct RiskService {
    repository: Arc<dyn RiskRepositoryTrait>,
    entity_repository: Arc<dyn EntityRepositoryTrait>,
    position_repository: Arc<dyn PositionRepositoryTrait>,
}

impl RiskService {
    pub fn new(
        repository: Arc<dyn RiskRepositoryTrait>,
        entity_repository: Arc<dyn EntityRepositoryTrait>,
        position_repository: Arc<dyn PositionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            entity_repository,
            position_repository,
        }
    }

    fn ensure_links(&self, input: &RiskInput) -> Result<()> {
        if let Some(entity_id) = &input.entity_id {
            self.entity_repository.get_by_id(entity_id).map_err(|_| {
                ValidationError::InvalidInput(format!("Entity {} does not exist", entity_id))
            })?;
        }
        if let Some(position_id) = &input.position_id {
            self.position_repository.get_by_id(position_id).map_err(|_| {
                ValidationError::InvalidInput(format!("Position {} does not exist", position_id))
            })?;
        }
        Ok(())
    }

    fn existing(&self, risk_id: Option<&str>) -> Result<Option<Risk>> {
        let Some(risk_id) = risk_id else {
            return Ok(None);
        };
        match self.repository.get_by_id(risk_id) {
            Ok(risk) => Ok(Some(risk)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn scheduled_review(input: &RiskInput, today: NaiveDate) -> Option<NaiveDate> {
    input
        .next_review_date
        .or_else(|| input.review_frequency.map(|f| f.next_review_from(today)))
}

#[async_trait]
impl RiskServiceTrait for RiskService {
    fn list_risks(&self, filter: &RiskFilter) -> Result<Vec<Risk>> {
        Ok(filter_risks(&self.repository.list()?, filter))
    }

    fn get_risk(&self, risk_id: &str) -> Result<Risk> {
        self.repository.get_by_id(risk_id)
    }

    fn summary(&self, today: NaiveDate) -> Result<RiskSummary> {
        Ok(risk_summary(&self.repository.list()?, today))
    }

    fn category_distribution(&self) -> Result<BTreeMap<RiskCategory, CategoryStats>> {
        Ok(category_distribution(&self.repository.list()?))
    }

    fn risk_matrix(&self) -> Result<[[usize; MATRIX_SIZE]; MATRIX_SIZE]> {
        Ok(risk_matrix(&self.repository.list()?))
    }

    fn review_schedule(&self, today: NaiveDate) -> Result<ReviewSchedule> {
        Ok(review_schedule(&self.repository.list()?, today))
    }

    async fn upsert_risk(&self, input: RiskInput, today: NaiveDate) -> Result<Risk> {
        input.validate()?;
        self.ensure_links(&input)?;
        let score = risk_score(input.likelihood, input.impact);
        let next_review_date = scheduled_review(&input, today);

        let Some(before) = self.existing(input.id.as_deref())? else {
            let created = self
                .repository
                .create(NewRisk {
                    id: input.id,
                    title: input.title.trim().to_string(),
                    description: input.description,
                    category: input.category,
                    entity_id: input.entity_id,
                    position_id: input.position_id,
                    owner: input.owner,
                    likelihood: input.likelihood,
                    impact: input.impact,
                    risk_score: score,
                    status: input.status,
                    mitigation_plan: input.mitigation_plan,
                    mitigation_actions: input.mitigation_actions,
                    review_frequency: input.review_frequency,
                    next_review_date,
                })
                .await?;
            info!(
                "Risk {} added: '{}' score {} ({})",
                created.id,
                created.title,
                created.risk_score,
                created.severity()
            );
            return Ok(created);
        };

        if !before.status.can_transition_to(input.status) {
            return Err(ValidationError::InvalidTransition {
                from: before.status.to_string(),
                to: input.status.to_string(),
            }
            .into());
        }

        let after = Risk {
            id: before.id.clone(),
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category,
            entity_id: input.entity_id,
            position_id: input.position_id,
            owner: input.owner,
            likelihood: input.likelihood,
            impact: input.impact,
            risk_score: score,
            status: input.status,
            mitigation_plan: input.mitigation_plan,
            mitigation_actions: input.mitigation_actions,
            review_frequency: input.review_frequency,
            next_review_date,
            last_reviewed: Some(today),
            created_at: before.created_at,
            updated_at: Utc::now().naive_utc(),
        };

        let changes = changed_fields(&before, &after);
        if changes.is_empty() {
            debug!("Risk {} reviewed without changes", before.id);
        }
        for change in &changes {
            info!(
                "Risk {} {}: '{}' -> '{}'",
                before.id, change.field, change.from, change.to
            );
        }
        self.repository.update(after).await
    }

    async fn delete_risk(&self, risk_id: &str) -> Result<()> {
        let deleted = self.repository.delete(risk_id).await?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound(format!("risk {}", risk_id)).into());
        }
        info!("Risk {} deleted", risk_id);
        Ok(())
    }
}
