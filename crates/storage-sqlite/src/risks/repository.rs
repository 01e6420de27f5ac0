use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::RiskDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, StorageError};
use crate::schema::risks;
use wealthdesk_core::errors::{Error, Result};
use wealthdesk_core::risks::{NewRisk, Risk, RiskRepositoryTrait};

pub struct RiskRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RiskRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_risk(conn: &mut SqliteConnection, risk_id: &str) -> Result<Risk> {
    let row = risks::table
        .find(risk_id)
        .select(RiskDB::as_select())
        .first(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| not_found("risk", risk_id))?;
    Ok(Risk::try_from(row)?)
}

#[async_trait]
impl RiskRepositoryTrait for RiskRepository {
    /// Highest score first.
    fn list(&self) -> Result<Vec<Risk>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<RiskDB> = risks::table
            .order((risks::risk_score.desc(), risks::title.asc()))
            .select(RiskDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Risk::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_by_id(&self, risk_id: &str) -> Result<Risk> {
        let mut conn = get_connection(&self.pool)?;
        load_risk(&mut conn, risk_id)
    }

    async fn create(&self, new_risk: NewRisk) -> Result<Risk> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Risk> {
                let id = new_risk
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let row = RiskDB::from_domain(new_risk, id.clone());
                diesel::insert_into(risks::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_risk(conn, &id)
            })
            .await
    }

    async fn update(&self, risk: Risk) -> Result<Risk> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Risk> {
                let row = RiskDB::from(risk);
                let updated = diesel::update(risks::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(not_found("risk", &row.id));
                }
                load_risk(conn, &row.id)
            })
            .await
    }

    async fn delete(&self, risk_id: &str) -> Result<usize> {
        let id = risk_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(risks::table.find(id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
