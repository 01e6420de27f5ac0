//! Persists the target allocation and compares it with the live snapshot.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use super::allocation_calculator::{compare_to_target, rebalancing_suggestions};
use super::allocation_model::{AllocationComparison, RebalancingSuggestion, TargetAllocation};
use crate::errors::{Error, Result};
use crate::portfolio::holdings::HoldingsServiceTrait;
use crate::settings::SettingsServiceTrait;

/// Settings key holding the JSON-encoded target allocation.
pub const KEY_TARGET_ALLOCATION: &str = "target_allocation";

#[async_trait]
pub trait AllocationServiceTrait: Send + Sync {
    /// The stored target, empty when none has been saved.
    fn get_target_allocation(&self) -> Result<TargetAllocation>;

    async fn set_target_allocation(&self, targets: TargetAllocation) -> Result<TargetAllocation>;

    fn compare_to_target(&self) -> Result<Vec<AllocationComparison>>;

    /// Suggestions at the configured rebalance threshold.
    fn rebalancing_suggestions(&self) -> Result<Vec<RebalancingSuggestion>>;
}

pub struct AllocationService {
    holdings_service: Arc<dyn HoldingsServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl AllocationService {
    pub fn new(
        holdings_service: Arc<dyn HoldingsServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            holdings_service,
            settings_service,
        }
    }
}

#[async_trait]
impl AllocationServiceTrait for AllocationService {
    fn get_target_allocation(&self) -> Result<TargetAllocation> {
        let Some(raw) = self.settings_service.get_setting_value(KEY_TARGET_ALLOCATION)? else {
            return Ok(TargetAllocation::default());
        };
        match serde_json::from_str::<TargetAllocation>(&raw) {
            Ok(targets) => Ok(targets),
            Err(e) => {
                warn!("Ignoring unreadable target allocation: {}", e);
                Ok(TargetAllocation::default())
            }
        }
    }

    async fn set_target_allocation(&self, targets: TargetAllocation) -> Result<TargetAllocation> {
        targets.validate()?;
        let raw = serde_json::to_string(&targets).map_err(|e| Error::Unexpected(e.to_string()))?;
        self.settings_service
            .set_setting_value(KEY_TARGET_ALLOCATION, &raw)
            .await?;
        info!(
            "Target allocation updated: {} classes, {}% allocated",
            targets.0.len(),
            targets.total()
        );
        Ok(targets)
    }

    fn compare_to_target(&self) -> Result<Vec<AllocationComparison>> {
        let snapshot = self.holdings_service.get_portfolio_overview()?;
        let targets = self.get_target_allocation()?;
        Ok(compare_to_target(&snapshot, &targets))
    }

    fn rebalancing_suggestions(&self) -> Result<Vec<RebalancingSuggestion>> {
        let threshold = self
            .settings_service
            .get_analytics_settings()?
            .rebalance_threshold_pct;
        let comparison = AllocationServiceTrait::compare_to_target(self)?;
        Ok(rebalancing_suggestions(&comparison, threshold))
    }
}
