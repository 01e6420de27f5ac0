use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use super::holdings_calculator::{allocation_chart, build_overview, filter_holdings};
use super::holdings_model::{
    AllocationSlice, HoldingsFilter, OverviewOptions, PortfolioSnapshot, ValuedHolding,
};
use crate::entities::EntityRepositoryTrait;
use crate::errors::{Error, Result};
use crate::fx::FxServiceTrait;
use crate::positions::PositionRepositoryTrait;
use crate::settings::SettingsServiceTrait;

/// Notified after any write that changes position values, ledgers, FX rates
/// or analytics settings.
pub trait ChangeSink: Send + Sync {
    fn portfolio_changed(&self);
}

/// Sink that drops every notification.
pub struct NoOpChangeSink;

impl ChangeSink for NoOpChangeSink {
    fn portfolio_changed(&self) {}
}

/// Sink connected after construction, for services the holdings service
/// itself reads from (FX and settings). Holds the target weakly.
#[derive(Default)]
pub struct DeferredChangeSink {
    target: RwLock<Option<Weak<dyn ChangeSink>>>,
}

impl DeferredChangeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<S: ChangeSink + 'static>(&self, sink: &Arc<S>) {
        let weak: Weak<S> = Arc::downgrade(sink);
        let weak: Weak<dyn ChangeSink> = weak;
        match self.target.write() {
            Ok(mut target) => *target = Some(weak),
            Err(poisoned) => *poisoned.into_inner() = Some(weak),
        }
    }
}

impl ChangeSink for DeferredChangeSink {
    fn portfolio_changed(&self) {
        let target = match self.target.read() {
            Ok(target) => target.as_ref().and_then(Weak::upgrade),
            Err(poisoned) => poisoned.into_inner().as_ref().and_then(Weak::upgrade),
        };
        if let Some(sink) = target {
            sink.portfolio_changed();
        }
    }
}

pub trait HoldingsServiceTrait: Send + Sync {
    /// The cached snapshot, rebuilt when missing.
    fn get_portfolio_overview(&self) -> Result<PortfolioSnapshot>;
    fn get_holdings(&self, filter: &HoldingsFilter) -> Result<Vec<ValuedHolding>>;
    fn get_allocation(&self) -> Result<Vec<AllocationSlice>>;
    fn invalidate(&self);
}

pub struct HoldingsService {
    position_repository: Arc<dyn PositionRepositoryTrait>,
    entity_repository: Arc<dyn EntityRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    cache: RwLock<Option<PortfolioSnapshot>>,
}

impl HoldingsService {
    pub fn new(
        position_repository: Arc<dyn PositionRepositoryTrait>,
        entity_repository: Arc<dyn EntityRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            position_repository,
            entity_repository,
            fx_service,
            settings_service,
            cache: RwLock::new(None),
        }
    }

    fn compute(&self) -> Result<PortfolioSnapshot> {
        let settings = self.settings_service.get_analytics_settings()?;
        let positions = self.position_repository.list_active()?;
        let entity_names: HashMap<String, String> = self
            .entity_repository
            .list()?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();
        let normalizer = self.fx_service.normalizer(settings.fallback_fx_rate)?;

        let options = OverviewOptions {
            reporting_currency: settings.reporting_currency,
            concentration_threshold_pct: settings.concentration_threshold_pct,
            hhi_threshold: settings.hhi_threshold,
            entity_names,
        };
        let snapshot = build_overview(&positions, &normalizer, &options);
        if !snapshot.fx_fallbacks.is_empty() {
            warn!(
                "Portfolio overview used fallback FX rates for {}",
                snapshot.fx_fallbacks.join(", ")
            );
        }
        Ok(snapshot)
    }
}

impl HoldingsServiceTrait for HoldingsService {
    fn get_portfolio_overview(&self) -> Result<PortfolioSnapshot> {
        if let Some(snapshot) = self
            .cache
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?
            .as_ref()
        {
            return Ok(snapshot.clone());
        }

        let snapshot = self.compute()?;
        *self
            .cache
            .write()
            .map_err(|e| Error::Unexpected(e.to_string()))? = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn get_holdings(&self, filter: &HoldingsFilter) -> Result<Vec<ValuedHolding>> {
        let snapshot = self.get_portfolio_overview()?;
        Ok(filter_holdings(&snapshot, filter))
    }

    fn get_allocation(&self) -> Result<Vec<AllocationSlice>> {
        let snapshot = self.get_portfolio_overview()?;
        Ok(allocation_chart(&snapshot))
    }

    fn invalidate(&self) {
        match self.cache.write() {
            Ok(mut cache) => *cache = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        debug!("Portfolio snapshot cache cleared");
    }
}

impl ChangeSink for HoldingsService {
    fn portfolio_changed(&self) {
        self.invalidate();
    }
}
