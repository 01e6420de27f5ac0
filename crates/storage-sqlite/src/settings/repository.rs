use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::app_settings::dsl::*;
use wealthdesk_core::errors::Result;
use wealthdesk_core::settings::SettingsRepositoryTrait;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_all(&self) -> Result<HashMap<String, String>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().collect())
    }

    fn get_setting(&self, key: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        app_settings
            .filter(setting_key.eq(key))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| not_found("setting", key))
    }

    async fn update_setting(&self, key: &str, value: &str) -> Result<()> {
        let row = AppSettingDB::new(key, value);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_settings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn update_settings(&self, pairs: Vec<(String, String)>) -> Result<()> {
        let rows: Vec<AppSettingDB> = pairs
            .into_iter()
            .map(|(key, value)| AppSettingDB::new(key, value))
            .collect();
        self.writer
            .exec(move |conn| {
                for row in &rows {
                    diesel::replace_into(app_settings)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }
}
