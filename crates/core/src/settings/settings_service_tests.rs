use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::*;
use crate::errors::{DatabaseError, Error, Result, ValidationError};

#[derive(Default)]
struct MockSettingsRepository {
    rows: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SettingsRepositoryTrait for MockSettingsRepository {
    fn get_all(&self) -> Result<HashMap<String, String>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_setting(&self, setting_key: &str) -> Result<String> {
        self.rows
            .lock()
            .unwrap()
            .get(setting_key)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(setting_key.to_string())))
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(setting_key.to_string(), setting_value.to_string());
        Ok(())
    }

    async fn update_settings(&self, pairs: Vec<(String, String)>) -> Result<()> {
        self.rows.lock().unwrap().extend(pairs);
        Ok(())
    }
}

fn service() -> (Arc<MockSettingsRepository>, SettingsService) {
    let repo = Arc::new(MockSettingsRepository::default());
    (repo.clone(), SettingsService::new(repo))
}

#[tokio::test]
async fn test_partial_update_keeps_other_values() {
    let (_, service) = service();
    let updated = service
        .update_analytics_settings(AnalyticsSettingsUpdate {
            concentration_threshold_pct: Some(dec!(10)),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.concentration_threshold_pct, dec!(10));
    assert_eq!(updated.hhi_threshold, dec!(2500));
    assert_eq!(updated.reporting_currency, "CAD");
}

#[tokio::test]
async fn test_invalid_update_is_not_written() {
    let (repo, service) = service();
    let result = service
        .update_analytics_settings(AnalyticsSettingsUpdate {
            reporting_currency: Some("EUR".to_string()),
            rebalance_threshold_pct: Some(dec!(-1)),
            ..Default::default()
        })
        .await;

    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::OutOfRange { .. }))
    ));
    assert!(repo.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_setting_is_none() {
    let (_, service) = service();
    assert_eq!(service.get_setting_value("theme").unwrap(), None);
    service.set_setting_value("theme", "dark").await.unwrap();
    assert_eq!(
        service.get_setting_value("theme").unwrap(),
        Some("dark".to_string())
    );
}
