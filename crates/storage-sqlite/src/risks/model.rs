use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{now, parse_enum};
use wealthdesk_core::risks::{NewRisk, Risk};

#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::risks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct RiskDB {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub entity_id: Option<String>,
    pub position_id: Option<String>,
    pub owner: Option<String>,
    pub likelihood: i32,
    pub impact: i32,
    pub risk_score: i32,
    pub status: String,
    pub mitigation_plan: Option<String>,
    pub mitigation_actions: Option<String>,
    pub review_frequency: Option<String>,
    pub next_review_date: Option<NaiveDate>,
    pub last_reviewed: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<RiskDB> for Risk {
    type Error = StorageError;

    fn try_from(db: RiskDB) -> Result<Self, Self::Error> {
        let review_frequency = db
            .review_frequency
            .as_deref()
            .map(|f| parse_enum(f, "review_frequency"))
            .transpose()?;
        Ok(Risk {
            category: parse_enum(&db.category, "category")?,
            status: parse_enum(&db.status, "status")?,
            review_frequency,
            id: db.id,
            title: db.title,
            description: db.description,
            entity_id: db.entity_id,
            position_id: db.position_id,
            owner: db.owner,
            likelihood: db.likelihood,
            impact: db.impact,
            risk_score: db.risk_score,
            mitigation_plan: db.mitigation_plan,
            mitigation_actions: db.mitigation_actions,
            next_review_date: db.next_review_date,
            last_reviewed: db.last_reviewed,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Risk> for RiskDB {
    fn from(risk: Risk) -> Self {
        Self {
            id: risk.id,
            title: risk.title,
            description: risk.description,
            category: risk.category.as_str().to_string(),
            entity_id: risk.entity_id,
            position_id: risk.position_id,
            owner: risk.owner,
            likelihood: risk.likelihood,
            impact: risk.impact,
            risk_score: risk.risk_score,
            status: risk.status.as_str().to_string(),
            mitigation_plan: risk.mitigation_plan,
            mitigation_actions: risk.mitigation_actions,
            review_frequency: risk.review_frequency.map(|f| f.as_str().to_string()),
            next_review_date: risk.next_review_date,
            last_reviewed: risk.last_reviewed,
            created_at: risk.created_at,
            updated_at: risk.updated_at,
        }
    }
}

impl RiskDB {
    pub fn from_domain(risk: NewRisk, id: String) -> Self {
        let timestamp = now();
        Self {
            id,
            title: risk.title,
            description: risk.description,
            category: risk.category.as_str().to_string(),
            entity_id: risk.entity_id,
            position_id: risk.position_id,
            owner: risk.owner,
            likelihood: risk.likelihood,
            impact: risk.impact,
            risk_score: risk.risk_score,
            status: risk.status.as_str().to_string(),
            mitigation_plan: risk.mitigation_plan,
            mitigation_actions: risk.mitigation_actions,
            review_frequency: risk.review_frequency.map(|f| f.as_str().to_string()),
            next_review_date: risk.next_review_date,
            last_reviewed: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}
