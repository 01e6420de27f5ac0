use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::attribution::{performance_attribution, Attribution, HoldingReturn};
use super::flow_classifier::cash_flows_for;
use super::performance_model::{PortfolioPerformance, PositionPerformance};
use super::returns::{annualize_return, income_yield, simple_return};
use super::xirr::{compute_irr, CashFlow};
use crate::constants::{DAYS_PER_YEAR, ONE_HUNDRED};
use crate::errors::Result;
use crate::fx::{CurrencyNormalizer, FxServiceTrait};
use crate::portfolio::holdings::PortfolioSnapshot;
use crate::positions::{Position, PositionRepositoryTrait};
use crate::settings::{AnalyticsSettings, SettingsServiceTrait};
use crate::transactions::{Transaction, TransactionRepositoryTrait};

pub trait PerformanceServiceTrait: Send + Sync {
    fn portfolio_performance(&self, as_of: NaiveDate) -> Result<PortfolioPerformance>;

    fn position_performance(&self, position_id: &str, as_of: NaiveDate)
        -> Result<PositionPerformance>;

    /// Money-weighted return of every active position taken together.
    fn portfolio_irr(&self, as_of: NaiveDate) -> Result<Option<Decimal>>;
}

/// Per-holding inputs for [`performance_attribution`], taken from a snapshot.
pub fn holding_returns(snapshot: &PortfolioSnapshot) -> Vec<HoldingReturn> {
    snapshot
        .holdings
        .iter()
        .map(|h| HoldingReturn {
            name: h.name.clone(),
            asset_class: h.asset_class,
            weight: h.weight,
            return_pct: h.gain_pct,
        })
        .collect()
}

pub fn snapshot_attribution(snapshot: &PortfolioSnapshot, benchmark_return: Decimal) -> Attribution {
    performance_attribution(&holding_returns(snapshot), benchmark_return)
}

pub struct PerformanceService {
    position_repository: Arc<dyn PositionRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl PerformanceService {
    pub fn new(
        position_repository: Arc<dyn PositionRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            position_repository,
            transaction_repository,
            fx_service,
            settings_service,
        }
    }

    fn context(&self) -> Result<(AnalyticsSettings, CurrencyNormalizer)> {
        let settings = self.settings_service.get_analytics_settings()?;
        let normalizer = self.fx_service.normalizer(settings.fallback_fx_rate)?;
        Ok((settings, normalizer))
    }

    fn evaluate(
        &self,
        position: &Position,
        transactions: &[Transaction],
        settings: &AnalyticsSettings,
        normalizer: &CurrencyNormalizer,
        as_of: NaiveDate,
    ) -> (PositionPerformance, Vec<CashFlow>) {
        let reporting = settings.reporting_currency.as_str();
        let value = normalizer.to_reporting(position.current_value, &position.currency, reporting);
        let cost = normalizer.to_reporting(position.cost_basis, &position.currency, reporting);
        let flows = cash_flows_for(transactions, normalizer, reporting);
        let income: Decimal = transactions
            .iter()
            .filter(|t| t.transaction_type.is_income())
            .map(|t| normalizer.to_reporting(t.total_amount, &t.currency, reporting))
            .sum();
        let irr_pct = compute_irr(&flows, value, as_of, &settings.xirr);
        debug!("{}: irr {:?} over {} flows", position.name, irr_pct, flows.len());

        let performance = PositionPerformance {
            position_id: position.id.clone(),
            name: position.name.clone(),
            asset_class: position.asset_class,
            value,
            cost,
            gain: value - cost,
            simple_return_pct: simple_return(value, cost),
            income,
            irr_pct,
            first_flow_date: flows.iter().map(|f| f.date).min(),
        };
        (performance, flows)
    }
}

fn years_between(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days()) / DAYS_PER_YEAR
}

impl PerformanceServiceTrait for PerformanceService {
    fn portfolio_performance(&self, as_of: NaiveDate) -> Result<PortfolioPerformance> {
        let (settings, normalizer) = self.context()?;
        let positions = self.position_repository.list_active()?;

        let mut all_flows = Vec::new();
        let mut rows = Vec::with_capacity(positions.len());
        for position in &positions {
            let transactions = self.transaction_repository.list_for_position(&position.id)?;
            let (row, flows) = self.evaluate(position, &transactions, &settings, &normalizer, as_of);
            all_flows.extend(flows);
            rows.push(row);
        }

        let total_value: Decimal = rows.iter().map(|r| r.value).sum();
        let total_cost: Decimal = rows.iter().map(|r| r.cost).sum();
        let income: Decimal = rows.iter().map(|r| r.income).sum();
        let simple_return_pct = simple_return(total_value, total_cost);
        let first_flow_date = all_flows.iter().map(|f| f.date).min();
        let annualized_return_pct = first_flow_date
            .map(|start| annualize_return(simple_return_pct / ONE_HUNDRED, years_between(start, as_of)))
            .unwrap_or(Decimal::ZERO);

        Ok(PortfolioPerformance {
            reporting_currency: settings.reporting_currency.clone(),
            as_of,
            total_value,
            total_cost,
            total_gain: total_value - total_cost,
            simple_return_pct,
            income,
            income_yield_pct: income_yield(income, total_value),
            irr_pct: compute_irr(&all_flows, total_value, as_of, &settings.xirr),
            annualized_return_pct,
            first_flow_date,
            positions: rows,
        })
    }

    fn position_performance(
        &self,
        position_id: &str,
        as_of: NaiveDate,
    ) -> Result<PositionPerformance> {
        let (settings, normalizer) = self.context()?;
        let position = self.position_repository.get_by_id(position_id)?;
        let transactions = self.transaction_repository.list_for_position(position_id)?;
        Ok(self
            .evaluate(&position, &transactions, &settings, &normalizer, as_of)
            .0)
    }

    fn portfolio_irr(&self, as_of: NaiveDate) -> Result<Option<Decimal>> {
        Ok(self.portfolio_performance(as_of)?.irr_pct)
    }
}
