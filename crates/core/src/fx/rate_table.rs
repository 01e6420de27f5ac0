use super::fx_errors::FxError;
use super::fx_model::ExchangeRate;
use super::fx_traits::RateLookup;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Dated FX rates organised as a currency graph.
///
/// Each direct pair keeps its own time series (and the inverse series).
/// Conversions between currencies without a direct quote walk the graph
/// breadth-first, so CAD -> EUR can go through USD.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    adj: HashMap<String, HashSet<String>>,
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
    latest_date: Option<NaiveDate>,
}

impl RateTable {
    pub fn new(exchange_rates: Vec<ExchangeRate>) -> Self {
        let mut table = RateTable::default();
        table.add_rates(exchange_rates);
        table
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Adds rates; a later rate for the same pair and day replaces the earlier one.
    pub fn add_rates(&mut self, rates: Vec<ExchangeRate>) {
        for rate in rates {
            let from = rate.from_currency.to_uppercase();
            let to = rate.to_currency.to_uppercase();
            if from == to || rate.rate <= Decimal::ZERO {
                continue;
            }
            let date = rate.as_of.date_naive();
            self.latest_date = Some(self.latest_date.map_or(date, |d| d.max(date)));

            self.rates
                .entry((from.clone(), to.clone()))
                .or_default()
                .insert(date, rate.rate);
            self.rates
                .entry((to.clone(), from.clone()))
                .or_default()
                .insert(date, Decimal::ONE / rate.rate);

            self.adj.entry(from.clone()).or_default().insert(to.clone());
            self.adj.entry(to).or_default().insert(from);
        }
    }

    /// Closest rate to `date` for a directly quoted pair, past or future.
    fn get_direct_rate(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        let history = self.rates.get(&(from.to_string(), to.to_string()))?;
        let prev = history.range(..=date).next_back();
        let next = history.range(date..).next();

        match (prev, next) {
            (Some((d1, r1)), Some((d2, r2))) => {
                if d1 == d2 {
                    return Some(*r1);
                }
                let dist_prev = (date - *d1).num_days().abs();
                let dist_next = (*d2 - date).num_days().abs();
                if dist_prev <= dist_next {
                    Some(*r1)
                } else {
                    Some(*r2)
                }
            }
            (Some((_, r)), None) | (None, Some((_, r))) => Some(*r),
            (None, None) => None,
        }
    }

    /// Rate for one unit of `from` in `to` on or near `date`.
    pub fn rate_on(&self, from: &str, to: &str, date: NaiveDate) -> Result<Decimal, FxError> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();
        if from == to {
            return Ok(Decimal::ONE);
        }

        let mut queue: VecDeque<(String, Decimal)> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();
        queue.push_back((from.clone(), Decimal::ONE));
        visited.insert(from.clone());

        while let Some((current, accumulated)) = queue.pop_front() {
            if current == to {
                return Ok(accumulated);
            }
            if let Some(neighbors) = self.adj.get(&current) {
                for neighbor in neighbors {
                    if visited.contains(neighbor) {
                        continue;
                    }
                    if let Some(rate) = self.get_direct_rate(&current, neighbor, date) {
                        visited.insert(neighbor.clone());
                        queue.push_back((neighbor.clone(), accumulated * rate));
                    }
                }
            }
        }

        Err(FxError::RateNotFound(format!(
            "No conversion path found for {} -> {} on or near {}",
            from, to, date
        )))
    }

    /// Most recent rate per direct pair, keyed by (from, to).
    pub fn latest_direct_rates(&self) -> HashMap<(String, String), Decimal> {
        self.rates
            .iter()
            .filter_map(|(pair, history)| {
                history
                    .iter()
                    .next_back()
                    .map(|(_, rate)| (pair.clone(), *rate))
            })
            .collect()
    }
}

impl RateLookup for RateTable {
    fn rate(&self, from: &str, to: &str) -> Result<Decimal, FxError> {
        match self.latest_date {
            Some(date) => self.rate_on(from, to, date),
            None if from.eq_ignore_ascii_case(to) => Ok(Decimal::ONE),
            None => Err(FxError::RateNotFound(format!(
                "No rates loaded for {} -> {}",
                from, to
            ))),
        }
    }
}
