//! In-memory repositories and fixtures shared by service tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use wealthdesk_market_data::{FxRateProvider, MarketDataProvider, ProviderRegistry};

use crate::commitments::{
    Commitment, CommitmentBalances, CommitmentRepositoryTrait, CommitmentUpdate, NewCommitment,
};
use crate::entities::{Entity, EntityRepositoryTrait, EntityType, EntityUpdate, NewEntity};
use crate::errors::{DatabaseError, Error, Result};
use crate::fx::{ExchangeRate, FxRepositoryTrait, FxService, NewExchangeRate};
use crate::portfolio::ledger::LedgerState;
use crate::portfolio::valuation::{NewValuation, Valuation, ValuationRepositoryTrait};
use crate::positions::{
    AssetClass, NewPosition, Position, PositionRepositoryTrait, PositionStatus, PositionUpdate,
    ValuationUpdate,
};
use crate::risks::{NewRisk, Risk, RiskCategory, RiskRepositoryTrait, RiskStatus};
use crate::settings::{SettingsRepositoryTrait, SettingsService};
use crate::transactions::{
    NewTransaction, Transaction, TransactionRepositoryTrait, TransactionType, TransactionUpdate,
};

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn not_found(what: &str, id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!("{} {}", what, id)))
}

pub fn entity(id: &str, name: &str) -> Entity {
    Entity {
        id: id.to_string(),
        name: name.to_string(),
        entity_type: EntityType::Corporation,
        base_currency: "CAD".to_string(),
        parent_id: None,
        notes: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// An active position carrying the given ledger and value.
pub fn position(
    id: &str,
    entity_id: &str,
    asset_class: AssetClass,
    currency: &str,
    quantity: Decimal,
    cost_basis: Decimal,
    current_value: Decimal,
) -> Position {
    let cost_per_unit = if quantity > Decimal::ZERO {
        cost_basis / quantity
    } else {
        Decimal::ZERO
    };
    Position {
        id: id.to_string(),
        entity_id: entity_id.to_string(),
        name: id.to_string(),
        symbol: None,
        asset_class,
        sub_class: None,
        currency: currency.to_string(),
        quantity,
        cost_basis,
        cost_per_unit,
        current_price: None,
        current_value,
        last_price_at: None,
        last_nav: None,
        last_nav_date: None,
        status: PositionStatus::Active,
        commitment_id: None,
        acquired_on: None,
        notes: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn transaction(
    id: &str,
    position_id: &str,
    transaction_type: TransactionType,
    date: NaiveDate,
    quantity: Decimal,
    total_amount: Decimal,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        position_id: position_id.to_string(),
        transaction_type,
        date,
        quantity,
        price_per_unit: None,
        total_amount,
        currency: "CAD".to_string(),
        fees: Decimal::ZERO,
        notes: None,
        created_at: timestamp(),
    }
}

/// An identified risk linked to entity `e1`.
pub fn risk(id: &str, category: RiskCategory, likelihood: i32, impact: i32) -> Risk {
    Risk {
        id: id.to_string(),
        title: format!("Risk {}", id),
        description: None,
        category,
        entity_id: Some("e1".to_string()),
        position_id: None,
        owner: None,
        likelihood,
        impact,
        risk_score: likelihood * impact,
        status: RiskStatus::Identified,
        mitigation_plan: None,
        mitigation_actions: None,
        review_frequency: None,
        next_review_date: None,
        last_reviewed: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

#[derive(Default)]
pub struct InMemoryEntities {
    pub rows: Mutex<Vec<Entity>>,
    pub references: Mutex<HashMap<String, i64>>,
}

impl InMemoryEntities {
    pub fn with(entities: Vec<Entity>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(entities),
            references: Mutex::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl EntityRepositoryTrait for InMemoryEntities {
    fn list(&self) -> Result<Vec<Entity>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_by_id(&self, entity_id: &str) -> Result<Entity> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == entity_id)
            .cloned()
            .ok_or_else(|| not_found("entity", entity_id))
    }

    fn count_references(&self, entity_id: &str) -> Result<i64> {
        Ok(*self
            .references
            .lock()
            .unwrap()
            .get(entity_id)
            .unwrap_or(&0))
    }

    async fn create(&self, new_entity: NewEntity) -> Result<Entity> {
        let created = Entity {
            id: new_entity
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_entity.name,
            entity_type: new_entity.entity_type,
            base_currency: new_entity.base_currency,
            parent_id: new_entity.parent_id,
            notes: new_entity.notes,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, entity_update: EntityUpdate) -> Result<Entity> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|e| e.id == entity_update.id)
            .ok_or_else(|| not_found("entity", &entity_update.id))?;
        row.name = entity_update.name;
        row.entity_type = entity_update.entity_type;
        row.base_currency = entity_update.base_currency;
        row.parent_id = entity_update.parent_id;
        row.notes = entity_update.notes;
        Ok(row.clone())
    }

    async fn delete(&self, entity_id: &str) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != entity_id);
        Ok(before - rows.len())
    }
}

#[derive(Default)]
pub struct InMemoryPositions {
    pub rows: Mutex<Vec<Position>>,
    pub valuation_writes: Mutex<Vec<String>>,
}

impl InMemoryPositions {
    pub fn with(positions: Vec<Position>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(positions),
            valuation_writes: Mutex::new(Vec::new()),
        })
    }

    pub fn get(&self, id: &str) -> Position {
        self.get_by_id(id).unwrap()
    }

    fn modify<F: FnOnce(&mut Position)>(&self, id: &str, f: F) -> Result<Position> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("position", id))?;
        f(row);
        Ok(row.clone())
    }
}

#[async_trait]
impl PositionRepositoryTrait for InMemoryPositions {
    fn list(&self) -> Result<Vec<Position>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn list_active(&self) -> Result<Vec<Position>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active())
            .cloned()
            .collect())
    }

    fn list_by_entity(&self, entity_id: &str) -> Result<Vec<Position>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.entity_id == entity_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, position_id: &str) -> Result<Position> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == position_id)
            .cloned()
            .ok_or_else(|| not_found("position", position_id))
    }

    async fn create(&self, new_position: NewPosition) -> Result<Position> {
        let mut created = position(
            &new_position
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            &new_position.entity_id,
            new_position.asset_class,
            &new_position.currency,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        created.name = new_position.name;
        created.symbol = new_position.symbol;
        created.sub_class = new_position.sub_class;
        created.commitment_id = new_position.commitment_id;
        created.acquired_on = new_position.acquired_on;
        created.notes = new_position.notes;
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, position_update: PositionUpdate) -> Result<Position> {
        let id = position_update.id.clone();
        self.modify(&id, |p| {
            p.name = position_update.name;
            p.symbol = position_update.symbol;
            p.asset_class = position_update.asset_class;
            p.sub_class = position_update.sub_class;
            p.commitment_id = position_update.commitment_id;
            p.notes = position_update.notes;
        })
    }

    async fn update_ledger(&self, position_id: &str, state: LedgerState) -> Result<Position> {
        self.modify(position_id, |p| {
            p.quantity = state.quantity;
            p.cost_basis = state.cost_basis;
            p.cost_per_unit = state.cost_per_unit;
            if p.acquired_on.is_none() {
                p.acquired_on = state.first_acquired_on;
            }
        })
    }

    async fn update_valuation(
        &self,
        position_id: &str,
        update: ValuationUpdate,
    ) -> Result<Position> {
        self.valuation_writes
            .lock()
            .unwrap()
            .push(position_id.to_string());
        self.modify(position_id, |p| {
            p.current_price = update.current_price;
            p.current_value = update.current_value;
            p.last_price_at = update.last_price_at;
            p.last_nav = update.last_nav;
            p.last_nav_date = update.last_nav_date;
        })
    }

    async fn set_status(&self, position_id: &str, status: PositionStatus) -> Result<Position> {
        self.modify(position_id, |p| p.status = status)
    }
}

#[derive(Default)]
pub struct InMemoryTransactions {
    pub rows: Mutex<Vec<Transaction>>,
}

impl InMemoryTransactions {
    pub fn with(transactions: Vec<Transaction>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(transactions),
        })
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactions {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| not_found("transaction", transaction_id))
    }

    fn list_for_position(&self, position_id: &str) -> Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.position_id == position_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.date);
        Ok(rows)
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let created = Transaction {
            id: new_transaction
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            position_id: new_transaction.position_id,
            transaction_type: new_transaction.transaction_type,
            date: new_transaction.date,
            quantity: new_transaction.quantity,
            price_per_unit: new_transaction.price_per_unit,
            total_amount: new_transaction.total_amount,
            currency: new_transaction.currency,
            fees: new_transaction.fees,
            notes: new_transaction.notes,
            created_at: timestamp(),
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, transaction_update: TransactionUpdate) -> Result<Transaction> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == transaction_update.id)
            .ok_or_else(|| not_found("transaction", &transaction_update.id))?;
        row.transaction_type = transaction_update.transaction_type;
        row.date = transaction_update.date;
        row.quantity = transaction_update.quantity;
        row.price_per_unit = transaction_update.price_per_unit;
        row.total_amount = transaction_update.total_amount;
        row.currency = transaction_update.currency;
        row.fees = transaction_update.fees;
        row.notes = transaction_update.notes;
        Ok(row.clone())
    }

    async fn delete(&self, transaction_id: &str) -> Result<Transaction> {
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| not_found("transaction", transaction_id))?;
        Ok(rows.remove(index))
    }
}

#[derive(Default)]
pub struct InMemoryValuations {
    pub rows: Mutex<Vec<Valuation>>,
}

#[async_trait]
impl ValuationRepositoryTrait for InMemoryValuations {
    fn list_for_position(&self, position_id: &str) -> Result<Vec<Valuation>> {
        let mut rows: Vec<Valuation> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.position_id == position_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    fn latest_for_position(&self, position_id: &str) -> Result<Option<Valuation>> {
        Ok(self.list_for_position(position_id)?.into_iter().next())
    }

    async fn create(&self, new_valuation: NewValuation) -> Result<Valuation> {
        let created = Valuation {
            id: Uuid::new_v4().to_string(),
            position_id: new_valuation.position_id,
            date: new_valuation.date,
            value_per_unit: new_valuation.value_per_unit,
            total_value: new_valuation.total_value,
            method: new_valuation.method,
            confidence: new_valuation.confidence,
            notes: new_valuation.notes,
            created_at: timestamp(),
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete(&self, valuation_id: &str) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|v| v.id != valuation_id);
        Ok(before - rows.len())
    }
}

#[derive(Default)]
pub struct InMemoryFxRates {
    pub rows: Mutex<Vec<ExchangeRate>>,
}

impl InMemoryFxRates {
    pub fn with_rate(from: &str, to: &str, rate: Decimal, as_of: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(vec![ExchangeRate {
                id: format!("{}{}", from, to),
                from_currency: from.to_string(),
                to_currency: to.to_string(),
                rate,
                as_of,
                source: "TEST".to_string(),
            }]),
        })
    }
}

#[async_trait]
impl FxRepositoryTrait for InMemoryFxRates {
    fn get_latest_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_historical_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_latest_exchange_rate(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.from_currency == from && r.to_currency == to)
            .max_by_key(|r| r.as_of)
            .cloned())
    }

    async fn save_exchange_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
        let saved = ExchangeRate {
            id: Uuid::new_v4().to_string(),
            from_currency: rate.from_currency,
            to_currency: rate.to_currency,
            rate: rate.rate,
            as_of: rate.as_of,
            source: rate.source,
        };
        self.rows.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn delete_exchange_rate(&self, rate_id: &str) -> Result<()> {
        self.rows.lock().unwrap().retain(|r| r.id != rate_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettings {
    pub rows: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SettingsRepositoryTrait for InMemorySettings {
    fn get_all(&self) -> Result<HashMap<String, String>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_setting(&self, setting_key: &str) -> Result<String> {
        self.rows
            .lock()
            .unwrap()
            .get(setting_key)
            .cloned()
            .ok_or_else(|| not_found("setting", setting_key))
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

#[derive(Default)]
pub struct InMemoryCommitments {
    pub rows: Mutex<Vec<Commitment>>,
}

impl InMemoryCommitments {
    fn modify<F: FnOnce(&mut Commitment)>(&self, id: &str, f: F) -> Result<Commitment> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("commitment", id))?;
        f(row);
        Ok(row.clone())
    }
}

#[async_trait]
impl CommitmentRepositoryTrait for InMemoryCommitments {
    fn list(&self) -> Result<Vec<Commitment>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_by_id(&self, commitment_id: &str) -> Result<Commitment> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == commitment_id)
            .cloned()
            .ok_or_else(|| not_found("commitment", commitment_id))
    }

    fn get_by_position(&self, position_id: &str) -> Result<Option<Commitment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.position_id == position_id)
            .cloned())
    }

    async fn create(&self, new_commitment: NewCommitment) -> Result<Commitment> {
        let unfunded_commitment = new_commitment.resolved_unfunded();
        let created = Commitment {
            id: new_commitment
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            position_id: new_commitment.position_id,
            fund_name: new_commitment.fund_name,
            vintage_year: new_commitment.vintage_year,
            total_commitment: new_commitment.total_commitment,
            capital_called: new_commitment.capital_called,
            unfunded_commitment,
            distributions_received: new_commitment.distributions_received,
            commitment_date: new_commitment.commitment_date,
            currency: new_commitment.currency,
            notes: new_commitment.notes,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, commitment_update: CommitmentUpdate) -> Result<Commitment> {
        let id = commitment_update.id.clone();
        self.modify(&id, |c| {
            c.fund_name = commitment_update.fund_name;
            c.vintage_year = commitment_update.vintage_year;
            c.commitment_date = commitment_update.commitment_date;
            c.notes = commitment_update.notes;
        })
    }

    async fn update_balances(
        &self,
        commitment_id: &str,
        balances: CommitmentBalances,
    ) -> Result<Commitment> {
        self.modify(commitment_id, |c| {
            c.total_commitment = balances.total_commitment;
            c.capital_called = balances.capital_called;
            c.unfunded_commitment = balances.unfunded_commitment;
            c.distributions_received = balances.distributions_received;
        })
    }

    async fn delete(&self, commitment_id: &str) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != commitment_id);
        Ok(before - rows.len())
    }
}

#[derive(Default)]
pub struct InMemoryRisks {
    pub rows: Mutex<Vec<Risk>>,
}

impl InMemoryRisks {
    pub fn with(risks: Vec<Risk>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(risks),
        })
    }
}

#[async_trait]
impl RiskRepositoryTrait for InMemoryRisks {
    fn list(&self) -> Result<Vec<Risk>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    fn get_by_id(&self, risk_id: &str) -> Result<Risk> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == risk_id)
            .cloned()
            .ok_or_else(|| not_found("risk", risk_id))
    }

    async fn create(&self, new_risk: NewRisk) -> Result<Risk> {
        let created = Risk {
            id: new_risk.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: new_risk.title,
            description: new_risk.description,
            category: new_risk.category,
            entity_id: new_risk.entity_id,
            position_id: new_risk.position_id,
            owner: new_risk.owner,
            likelihood: new_risk.likelihood,
            impact: new_risk.impact,
            risk_score: new_risk.risk_score,
            status: new_risk.status,
            mitigation_plan: new_risk.mitigation_plan,
            mitigation_actions: new_risk.mitigation_actions,
            review_frequency: new_risk.review_frequency,
            next_review_date: new_risk.next_review_date,
            last_reviewed: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, risk: Risk) -> Result<Risk> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == risk.id)
            .ok_or_else(|| not_found("risk", &risk.id))?;
        *row = risk;
        Ok(row.clone())
    }

    async fn delete(&self, risk_id: &str) -> Result<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != risk_id);
        Ok(before - rows.len())
    }
}

pub fn registry(providers: Vec<Arc<dyn MarketDataProvider>>) -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::new(
        providers,
        Vec::<Arc<dyn FxRateProvider>>::new(),
        Duration::from_secs(60),
    ))
}

pub fn fx_service(rates: Arc<InMemoryFxRates>) -> Arc<FxService> {
    Arc::new(FxService::new(rates, registry(Vec::new())))
}

pub fn settings_service() -> Arc<SettingsService> {
    Arc::new(SettingsService::new(Arc::new(InMemorySettings::default())))
}
