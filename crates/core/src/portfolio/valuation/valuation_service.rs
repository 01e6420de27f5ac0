use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use wealthdesk_market_data::{AssetKind, ProviderRegistry, QuoteRequest};

use super::valuation_calculator::{quoted_price, value_position};
use super::valuation_model::{NewValuation, PriceRefreshSummary, Valuation};
use super::valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
use crate::errors::{Result, ValidationError};
use crate::fx::FxServiceTrait;
use crate::portfolio::holdings::{ChangeSink, NoOpChangeSink};
use crate::positions::{Position, PositionRepositoryTrait, ValuationUpdate};
use crate::settings::SettingsServiceTrait;

/// Symbol used for gold positions that carry none.
const GOLD_SPOT_SYMBOL: &str = "XAU";

fn quote_request(position: &Position) -> Option<QuoteRequest> {
    let kind = position.asset_class.quote_kind()?;
    let symbol = match (&position.symbol, kind) {
        (Some(symbol), _) if !symbol.trim().is_empty() => symbol.trim().to_string(),
        (_, AssetKind::Metal) => GOLD_SPOT_SYMBOL.to_string(),
        _ => return None,
    };
    Some(QuoteRequest::new(symbol, kind).with_currency(position.currency.clone()))
}

pub struct ValuationService {
    position_repository: Arc<dyn PositionRepositoryTrait>,
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
    fx_service: Arc<dyn FxServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    change_sink: Arc<dyn ChangeSink>,
}

impl ValuationService {
    pub fn new(
        position_repository: Arc<dyn PositionRepositoryTrait>,
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
        registry: Arc<ProviderRegistry>,
        fx_service: Arc<dyn FxServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            position_repository,
            valuation_repository,
            registry,
            fx_service,
            settings_service,
            change_sink: Arc::new(NoOpChangeSink),
        }
    }

    pub fn with_change_sink(mut self, change_sink: Arc<dyn ChangeSink>) -> Self {
        self.change_sink = change_sink;
        self
    }

    /// Re-applies the pricing rules without a live quote and stores the result.
    async fn revalue(&self, position: &Position) -> Result<Position> {
        let valuation = value_position(position, None);
        self.position_repository
            .update_valuation(&position.id, valuation.into_update(position))
            .await
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    fn get_valuations(&self, position_id: &str) -> Result<Vec<Valuation>> {
        self.valuation_repository.list_for_position(position_id)
    }

    async fn record_valuation(&self, new_valuation: NewValuation) -> Result<Valuation> {
        if new_valuation.total_value < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Valuation total cannot be negative".to_string(),
            )
            .into());
        }
        let position = self
            .position_repository
            .get_by_id(&new_valuation.position_id)?;

        let value_per_unit = if position.quantity > Decimal::ZERO {
            new_valuation.total_value / position.quantity
        } else {
            new_valuation.total_value
        };
        let saved = self
            .valuation_repository
            .create(NewValuation {
                value_per_unit,
                ..new_valuation
            })
            .await?;

        let update = ValuationUpdate {
            current_price: if position.quantity > Decimal::ZERO {
                Some(value_per_unit)
            } else {
                position.current_price
            },
            current_value: saved.total_value,
            last_price_at: position.last_price_at,
            last_nav: Some(saved.total_value),
            last_nav_date: Some(saved.date),
        };
        self.position_repository
            .update_valuation(&position.id, update)
            .await?;
        info!(
            "Recorded {} valuation of {} for {} on {}",
            saved.method.as_str(),
            saved.total_value,
            position.name,
            saved.date
        );
        self.change_sink.portfolio_changed();
        Ok(saved)
    }

    async fn refresh_prices(&self) -> Result<PriceRefreshSummary> {
        let positions = self.position_repository.list_active()?;
        self.refresh_positions(positions).await
    }

    async fn refresh_positions(&self, positions: Vec<Position>) -> Result<PriceRefreshSummary> {
        let settings = self.settings_service.get_analytics_settings()?;
        let normalizer = self.fx_service.normalizer(settings.fallback_fx_rate)?;
        self.registry.set_cache_ttl(settings.quote_cache_ttl());

        let active: Vec<Position> = positions.into_iter().filter(|p| p.is_active()).collect();
        let mut summary = PriceRefreshSummary {
            total: active.len(),
            ..Default::default()
        };

        let mut quotable = Vec::new();
        let mut unquoted = Vec::new();
        for position in active {
            match quote_request(&position) {
                Some(request) => quotable.push((position, request)),
                None => unquoted.push(position),
            }
        }

        let registry = self.registry.clone();
        let results: Vec<_> = stream::iter(quotable.into_iter().map(|(position, request)| {
            let registry = registry.clone();
            async move {
                let result = registry.latest_quote(&request).await;
                (position, result)
            }
        }))
        .buffer_unordered(settings.refresh_concurrency.max(1))
        .collect()
        .await;

        for (position, result) in results {
            match result {
                Ok(snapshot) => {
                    let quote = quoted_price(&snapshot, &position.currency, &normalizer);
                    let valuation = value_position(&position, Some(quote));
                    debug!(
                        "{}: {} {} from {}",
                        position.name, valuation.current_value, position.currency, snapshot.source
                    );
                    match self
                        .position_repository
                        .update_valuation(&position.id, valuation.into_update(&position))
                        .await
                    {
                        Ok(_) => summary.updated += 1,
                        Err(e) => summary.errors.push(format!("{}: {}", position.name, e)),
                    }
                }
                Err(e) => {
                    warn!("Price refresh failed for {}: {}", position.name, e);
                    summary.errors.push(format!("{}: {}", position.name, e));
                }
            }
        }

        for position in unquoted {
            if let Err(e) = self.revalue(&position).await {
                summary.errors.push(format!("{}: {}", position.name, e));
            }
        }

        self.change_sink.portfolio_changed();
        info!(
            "Price refresh: {}/{} positions updated, {} errors",
            summary.updated,
            summary.total,
            summary.errors.len()
        );
        Ok(summary)
    }
}
