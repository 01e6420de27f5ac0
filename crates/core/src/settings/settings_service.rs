use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::settings_model::{AnalyticsSettings, AnalyticsSettingsUpdate};
use super::settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::portfolio::holdings::{ChangeSink, NoOpChangeSink};

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
    change_sink: Arc<dyn ChangeSink>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
            change_sink: Arc::new(NoOpChangeSink),
        }
    }

    /// Sets the sink notified after every settings write.
    pub fn with_change_sink(mut self, change_sink: Arc<dyn ChangeSink>) -> Self {
        self.change_sink = change_sink;
        self
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_analytics_settings(&self) -> Result<AnalyticsSettings> {
        let values = self.settings_repository.get_all()?;
        Ok(AnalyticsSettings::from_pairs(&values))
    }

    async fn update_analytics_settings(
        &self,
        update: AnalyticsSettingsUpdate,
    ) -> Result<AnalyticsSettings> {
        update.validate()?;
        let pairs = update.to_pairs();
        if !pairs.is_empty() {
            let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
            info!("Updating analytics settings: {}", keys.join(", "));
            self.settings_repository.update_settings(pairs).await?;
            self.change_sink.portfolio_changed();
        }
        self.get_analytics_settings()
    }

    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()> {
        self.settings_repository.update_setting(key, value).await?;
        self.change_sink.portfolio_changed();
        Ok(())
    }
}
