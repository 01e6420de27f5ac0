use super::currency_normalizer::CurrencyNormalizer;
use super::fx_errors::FxError;
use super::fx_model::{ExchangeRate, FxRefreshSummary, NewExchangeRate};
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait, RateLookup};
use super::rate_table::RateTable;
use crate::errors::Result;
use crate::portfolio::holdings::{ChangeSink, NoOpChangeSink};
use async_trait::async_trait;
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};
use wealthdesk_market_data::ProviderRegistry;

#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
    table: Arc<RwLock<Option<RateTable>>>,
    change_sink: Arc<dyn ChangeSink>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            repository,
            registry,
            table: Arc::new(RwLock::new(None)),
            change_sink: Arc::new(NoOpChangeSink),
        }
    }

    /// Sets the sink notified after every stored rate change.
    pub fn with_change_sink(mut self, change_sink: Arc<dyn ChangeSink>) -> Self {
        self.change_sink = change_sink;
        self
    }

    fn load_table(&self) -> Result<RateTable> {
        if let Some(table) = self
            .table
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?
            .as_ref()
        {
            return Ok(table.clone());
        }

        let table = RateTable::new(self.repository.get_historical_exchange_rates()?);
        if table.is_empty() {
            warn!("No exchange rates stored, conversions will use fallbacks");
        }
        *self
            .table
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))? = Some(table.clone());
        Ok(table)
    }

    fn invalidate(&self) -> Result<()> {
        *self
            .table
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))? = None;
        self.change_sink.portfolio_changed();
        Ok(())
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn rate_table(&self) -> Result<RateTable> {
        self.load_table()
    }

    fn normalizer(&self, default_rate: Decimal) -> Result<CurrencyNormalizer> {
        let table = self.load_table()?;
        let known = table.latest_direct_rates();
        Ok(CurrencyNormalizer::new(Arc::new(table), default_rate).with_known_rates(known))
    }

    fn get_latest_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal> {
        if from_currency.eq_ignore_ascii_case(to_currency) {
            return Ok(Decimal::ONE);
        }
        if let Some(rate) = self
            .repository
            .get_latest_exchange_rate(from_currency, to_currency)?
        {
            return Ok(rate.rate);
        }
        Ok(self.load_table()?.rate(from_currency, to_currency)?)
    }

    fn convert_currency(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal> {
        Ok(amount * self.get_latest_exchange_rate(from_currency, to_currency)?)
    }

    async fn add_exchange_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        new_rate.validate()?;
        let saved = self.repository.save_exchange_rate(new_rate).await?;
        self.invalidate()?;
        Ok(saved)
    }

    async fn delete_exchange_rate(&self, rate_id: &str) -> Result<()> {
        self.repository.delete_exchange_rate(rate_id).await?;
        self.invalidate()
    }

    async fn refresh_rates(&self, pairs: &[(String, String)]) -> Result<FxRefreshSummary> {
        let mut summary = FxRefreshSummary {
            total: pairs.len(),
            ..Default::default()
        };

        for (from, to) in pairs {
            match self.registry.fx_rate(from, to).await {
                Ok(quote) => {
                    let new_rate = NewExchangeRate {
                        from_currency: quote.from,
                        to_currency: quote.to,
                        rate: quote.rate,
                        as_of: quote.timestamp,
                        source: quote.source,
                    };
                    match self.repository.save_exchange_rate(new_rate).await {
                        Ok(_) => summary.updated += 1,
                        Err(e) => summary.errors.push(format!("{}/{}: {}", from, to, e)),
                    }
                }
                Err(e) => {
                    warn!("FX refresh failed for {}/{}: {}", from, to, e);
                    summary.errors.push(format!("{}/{}: {}", from, to, e));
                }
            }
        }

        if summary.updated > 0 {
            self.invalidate()?;
        }
        info!(
            "FX refresh: {}/{} pairs updated",
            summary.updated, summary.total
        );
        Ok(summary)
    }
}
