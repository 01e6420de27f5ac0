//! Entity domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Corporation,
    Individual,
    Trust,
    Holding,
    Partnership,
    Other,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Corporation => "Corporation",
            EntityType::Individual => "Individual",
            EntityType::Trust => "Trust",
            EntityType::Holding => "Holding",
            EntityType::Partnership => "Partnership",
            EntityType::Other => "Other",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corporation" | "corp" | "company" => Ok(EntityType::Corporation),
            "individual" | "person" => Ok(EntityType::Individual),
            "trust" => Ok(EntityType::Trust),
            "holding" | "holdco" => Ok(EntityType::Holding),
            "partnership" | "lp" => Ok(EntityType::Partnership),
            "other" => Ok(EntityType::Other),
            _ => Err(ValidationError::InvalidInput(format!(
                "Unknown entity type '{}'",
                s
            ))),
        }
    }
}

/// An ownership vehicle. Entities form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub entity_type: EntityType,
    pub base_currency: String,
    pub parent_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntity {
    pub id: Option<String>,
    pub name: String,
    pub entity_type: EntityType,
    pub base_currency: String,
    pub parent_id: Option<String>,
    pub notes: Option<String>,
}

impl NewEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_entity_fields(&self.name, &self.base_currency)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityUpdate {
    pub id: String,
    pub name: String,
    pub entity_type: EntityType,
    pub base_currency: String,
    pub parent_id: Option<String>,
    pub notes: Option<String>,
}

impl EntityUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_entity_fields(&self.name, &self.base_currency)
    }
}

fn validate_entity_fields(name: &str, base_currency: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name".to_string()));
    }
    if base_currency.len() != 3 || !base_currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidInput(format!(
            "Invalid base currency '{}'",
            base_currency
        )));
    }
    Ok(())
}
