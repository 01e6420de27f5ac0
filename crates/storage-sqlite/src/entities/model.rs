//! Database models for entities.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{now, parse_enum};
use wealthdesk_core::entities::{Entity, EntityUpdate, NewEntity};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::entities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntityDB {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub base_currency: String,
    pub parent_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::entities)]
pub struct NewEntityDB {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub base_currency: String,
    pub parent_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable columns. `parent_id` and `notes` are written even when `None`.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::entities)]
#[diesel(treat_none_as_null = true)]
pub struct EntityChangesDB {
    pub name: String,
    pub entity_type: String,
    pub base_currency: String,
    pub parent_id: Option<String>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<EntityDB> for Entity {
    type Error = StorageError;

    fn try_from(db: EntityDB) -> Result<Self, Self::Error> {
        Ok(Entity {
            entity_type: parse_enum(&db.entity_type, "entity_type")?,
            id: db.id,
            name: db.name,
            base_currency: db.base_currency,
            parent_id: db.parent_id,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl NewEntityDB {
    pub fn from_domain(new_entity: NewEntity, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            name: new_entity.name,
            entity_type: new_entity.entity_type.as_str().to_string(),
            base_currency: new_entity.base_currency,
            parent_id: new_entity.parent_id,
            notes: new_entity.notes,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl From<EntityUpdate> for EntityChangesDB {
    fn from(update: EntityUpdate) -> Self {
        Self {
            name: update.name,
            entity_type: update.entity_type.as_str().to_string(),
            base_currency: update.base_currency,
            parent_id: update.parent_id,
            notes: update.notes,
            updated_at: now(),
        }
    }
}
