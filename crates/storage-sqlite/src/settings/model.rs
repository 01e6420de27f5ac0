//! Database model for application settings.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One key/value row. Typed parsing happens in the core settings service.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::app_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AppSettingDB {
    pub setting_key: String,
    pub setting_value: String,
}

impl AppSettingDB {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            setting_key: key.into(),
            setting_value: value.into(),
        }
    }
}
