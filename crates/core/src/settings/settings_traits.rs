//! Repository and service traits for settings.

use async_trait::async_trait;
use std::collections::HashMap;

use super::settings_model::{AnalyticsSettings, AnalyticsSettingsUpdate};
use crate::errors::Result;

/// Key/value settings store.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Every stored row.
    fn get_all(&self) -> Result<HashMap<String, String>>;

    /// A single value. Fails with `DatabaseError::NotFound` when missing.
    fn get_setting(&self, setting_key: &str) -> Result<String>;

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;

    /// Writes several rows in one transaction.
    async fn update_settings(&self, pairs: Vec<(String, String)>) -> Result<()>;
}

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_analytics_settings(&self) -> Result<AnalyticsSettings>;

    async fn update_analytics_settings(
        &self,
        update: AnalyticsSettingsUpdate,
    ) -> Result<AnalyticsSettings>;

    /// Returns None if the key is not stored.
    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;

    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()>;
}
