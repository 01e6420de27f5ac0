use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::risks_calculator::MATRIX_SIZE;
use super::risks_model::{
    CategoryStats, NewRisk, Risk, RiskCategory, RiskFilter, RiskInput, RiskSummary,
    ReviewSchedule,
};
use crate::errors::Result;

/// Trait defining the contract for Risk repository operations.
#[async_trait]
pub trait RiskRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Risk>>;
    fn get_by_id(&self, risk_id: &str) -> Result<Risk>;
    async fn create(&self, new_risk: NewRisk) -> Result<Risk>;
    /// Replaces every stored field of the risk with `risk.id`.
    async fn update(&self, risk: Risk) -> Result<Risk>;
    async fn delete(&self, risk_id: &str) -> Result<usize>;
}

/// Trait defining the contract for Risk service operations.
///
/// `today` is always supplied by the caller so derived review states are
/// deterministic.
#[async_trait]
pub trait RiskServiceTrait: Send + Sync {
    fn list_risks(&self, filter: &RiskFilter) -> Result<Vec<Risk>>;
    fn get_risk(&self, risk_id: &str) -> Result<Risk>;
    fn summary(&self, today: NaiveDate) -> Result<RiskSummary>;
    fn category_distribution(&self) -> Result<BTreeMap<RiskCategory, CategoryStats>>;
    fn risk_matrix(&self) -> Result<[[usize; MATRIX_SIZE]; MATRIX_SIZE]>;
    fn review_schedule(&self, today: NaiveDate) -> Result<ReviewSchedule>;
    /// Creates the risk when `input.id` is absent or unknown, otherwise
    /// updates it. The score is recomputed either way.
    async fn upsert_risk(&self, input: RiskInput, today: NaiveDate) -> Result<Risk>;
    async fn delete_risk(&self, risk_id: &str) -> Result<()>;
}
