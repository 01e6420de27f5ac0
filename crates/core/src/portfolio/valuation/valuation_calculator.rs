use log::debug;
use rust_decimal::Decimal;
use wealthdesk_market_data::PriceSnapshot;

use super::valuation_model::{PositionValuation, QuotedPrice, ValuationSource};
use crate::fx::CurrencyNormalizer;
use crate::positions::{Position, ValuationUpdate};

/// Converts a raw quote into the position currency.
pub fn quoted_price(
    snapshot: &PriceSnapshot,
    position_currency: &str,
    normalizer: &CurrencyNormalizer,
) -> QuotedPrice {
    QuotedPrice {
        price: normalizer.to_reporting(snapshot.price, &snapshot.currency, position_currency),
        as_of: snapshot.timestamp,
    }
}

/// Applies the pricing rules to one position.
///
/// Liquid positions with a fresh quote are marked to market. Otherwise the
/// latest manual NAV wins, then (for liquid positions) the last known price,
/// then cost basis.
pub fn value_position(position: &Position, quote: Option<QuotedPrice>) -> PositionValuation {
    if position.is_liquid() {
        if let Some(quote) = quote {
            return PositionValuation {
                current_price: Some(quote.price),
                current_value: quote.price * position.quantity,
                source: ValuationSource::LiveQuote,
                priced_at: Some(quote.as_of),
            };
        }
    }

    if let Some(nav) = position.last_nav {
        let price = if position.quantity > Decimal::ZERO {
            nav / position.quantity
        } else {
            nav
        };
        debug!("Valuing {} at last NAV {}", position.name, nav);
        return PositionValuation {
            current_price: Some(price),
            current_value: nav,
            source: ValuationSource::LastNav,
            priced_at: position.last_price_at,
        };
    }

    if position.is_liquid() {
        if let Some(price) = position.current_price {
            return PositionValuation {
                current_price: Some(price),
                current_value: price * position.quantity,
                source: ValuationSource::LastPrice,
                priced_at: position.last_price_at,
            };
        }
    }

    debug!("Holding {} at cost basis {}", position.name, position.cost_basis);
    PositionValuation {
        current_price: if position.quantity > Decimal::ZERO {
            Some(position.cost_per_unit)
        } else {
            None
        },
        current_value: position.cost_basis,
        source: ValuationSource::CostBasis,
        priced_at: position.last_price_at,
    }
}

impl PositionValuation {
    pub fn into_update(self, position: &Position) -> ValuationUpdate {
        ValuationUpdate {
            current_price: self.current_price,
            current_value: self.current_value,
            last_price_at: self.priced_at,
            last_nav: position.last_nav,
            last_nav_date: position.last_nav_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::FxError;
    use crate::positions::{AssetClass, PositionStatus};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn position(asset_class: AssetClass) -> Position {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Position {
            id: "p1".to_string(),
            entity_id: "e1".to_string(),
            name: "Holding".to_string(),
            symbol: Some("XYZ".to_string()),
            asset_class,
            sub_class: None,
            currency: "CAD".to_string(),
            quantity: dec!(10),
            cost_basis: dec!(1000),
            cost_per_unit: dec!(100),
            current_price: None,
            current_value: Decimal::ZERO,
            last_price_at: None,
            last_nav: None,
            last_nav_date: None,
            status: PositionStatus::Active,
            commitment_id: None,
            acquired_on: None,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn quote(price: Decimal) -> QuotedPrice {
        QuotedPrice {
            price,
            as_of: Utc.with_ymd_and_hms(2024, 6, 28, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_liquid_with_quote_marks_to_market() {
        let valued = value_position(&position(AssetClass::PublicEquities), Some(quote(dec!(120))));
        assert_eq!(valued.current_value, dec!(1200));
        assert_eq!(valued.current_price, Some(dec!(120)));
        assert_eq!(valued.source, ValuationSource::LiveQuote);
    }

    #[test]
    fn test_illiquid_ignores_quote_and_uses_nav() {
        let mut fund = position(AssetClass::Fund);
        fund.last_nav = Some(dec!(1500));
        let valued = value_position(&fund, Some(quote(dec!(999))));
        assert_eq!(valued.current_value, dec!(1500));
        assert_eq!(valued.current_price, Some(dec!(150)));
        assert_eq!(valued.source, ValuationSource::LastNav);
    }

    #[test]
    fn test_illiquid_without_nav_holds_cost() {
        let valued = value_position(&position(AssetClass::RealEstate), None);
        assert_eq!(valued.current_value, dec!(1000));
        assert_eq!(valued.current_price, Some(dec!(100)));
        assert_eq!(valued.source, ValuationSource::CostBasis);
    }

    #[test]
    fn test_liquid_without_quote_uses_last_price() {
        let mut stock = position(AssetClass::Crypto);
        stock.current_price = Some(dec!(90));
        let valued = value_position(&stock, None);
        assert_eq!(valued.current_value, dec!(900));
        assert_eq!(valued.source, ValuationSource::LastPrice);
    }

    #[test]
    fn test_quote_converted_to_position_currency() {
        let lookup = |_: &str, _: &str| -> Result<Decimal, FxError> { Ok(dec!(1.25)) };
        let normalizer = CurrencyNormalizer::new(Arc::new(lookup), Decimal::ONE);
        let snapshot = PriceSnapshot::new("XYZ", dec!(100), "USD", "TEST");

        let converted = quoted_price(&snapshot, "CAD", &normalizer);
        assert_eq!(converted.price, dec!(125));

        let valued = value_position(&position(AssetClass::PublicEquities), Some(converted));
        assert_eq!(valued.current_value, dec!(1250));
    }
}
