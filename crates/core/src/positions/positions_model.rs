//! Position domain models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::positions_constants::{
    AGING_MAX_DAYS, ASSET_CLASS_MAPPING, FRESH_MAX_DAYS, STALE_MAX_DAYS,
};
use crate::errors::ValidationError;
use wealthdesk_market_data::AssetKind;

/// Closed set of asset classes. Raw import strings go through
/// [`AssetClass::normalize`]; nothing downstream compares strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    #[serde(rename = "Public Equities")]
    PublicEquities,
    #[serde(rename = "Bonds")]
    Bonds,
    #[serde(rename = "Cash & Equivalents")]
    CashEquivalents,
    #[serde(rename = "Crypto")]
    Crypto,
    #[serde(rename = "Gold")]
    Gold,
    #[serde(rename = "Private Business")]
    PrivateBusiness,
    #[serde(rename = "Venture Fund")]
    VentureFund,
    #[serde(rename = "Venture Entity")]
    VentureEntity,
    #[serde(rename = "Fund")]
    Fund,
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "Derivatives")]
    Derivatives,
    #[serde(rename = "Other")]
    Other,
}

impl AssetClass {
    pub const ALL: [AssetClass; 12] = [
        AssetClass::PublicEquities,
        AssetClass::Bonds,
        AssetClass::CashEquivalents,
        AssetClass::Crypto,
        AssetClass::Gold,
        AssetClass::PrivateBusiness,
        AssetClass::VentureFund,
        AssetClass::VentureEntity,
        AssetClass::Fund,
        AssetClass::RealEstate,
        AssetClass::Derivatives,
        AssetClass::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            AssetClass::PublicEquities => "Public Equities",
            AssetClass::Bonds => "Bonds",
            AssetClass::CashEquivalents => "Cash & Equivalents",
            AssetClass::Crypto => "Crypto",
            AssetClass::Gold => "Gold",
            AssetClass::PrivateBusiness => "Private Business",
            AssetClass::VentureFund => "Venture Fund",
            AssetClass::VentureEntity => "Venture Entity",
            AssetClass::Fund => "Fund",
            AssetClass::RealEstate => "Real Estate",
            AssetClass::Derivatives => "Derivatives",
            AssetClass::Other => "Other",
        }
    }

    /// Whether the class can be sold quickly at a quoted price.
    pub fn is_liquid(&self) -> bool {
        matches!(
            self,
            AssetClass::PublicEquities
                | AssetClass::Crypto
                | AssetClass::Gold
                | AssetClass::CashEquivalents
                | AssetClass::Bonds
        )
    }

    /// Market data kind used to request a quote, if the class is quoted at all.
    pub fn quote_kind(&self) -> Option<AssetKind> {
        match self {
            AssetClass::PublicEquities | AssetClass::Bonds => Some(AssetKind::Equity),
            AssetClass::Crypto => Some(AssetKind::Crypto),
            AssetClass::Gold => Some(AssetKind::Metal),
            _ => None,
        }
    }

    /// Maps an import label onto a class. Unknown labels become `Other`.
    pub fn normalize(raw: &str) -> AssetClass {
        raw.parse().unwrap_or(AssetClass::Other)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AssetClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if let Some(class) = AssetClass::ALL
            .iter()
            .find(|c| c.display_name().to_lowercase() == key)
        {
            return Ok(*class);
        }
        ASSET_CLASS_MAPPING
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, class)| *class)
            .ok_or_else(|| ValidationError::InvalidInput(format!("Unknown asset class '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionStatus {
    Active,
    Exited,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Active => "ACTIVE",
            PositionStatus::Exited => "EXITED",
        }
    }
}

impl FromStr for PositionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(PositionStatus::Active),
            "EXITED" => Ok(PositionStatus::Exited),
            _ => Err(ValidationError::InvalidInput(format!(
                "Unknown position status '{}'",
                s
            ))),
        }
    }
}

/// Age of the last price or valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Freshness {
    Fresh,
    Aging,
    Stale,
    VeryStale,
    Unknown,
}

impl Freshness {
    pub fn from_timestamp(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Freshness {
        let Some(last) = last else {
            return Freshness::Unknown;
        };
        let days = (now - last).num_days();
        if days <= FRESH_MAX_DAYS {
            Freshness::Fresh
        } else if days <= AGING_MAX_DAYS {
            Freshness::Aging
        } else if days <= STALE_MAX_DAYS {
            Freshness::Stale
        } else {
            Freshness::VeryStale
        }
    }
}

/// A holding owned by exactly one entity.
///
/// `quantity`, `cost_basis` and `cost_per_unit` are only written by the
/// ledger replay. `current_price`/`current_value` are only written by the
/// valuation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: AssetClass,
    pub sub_class: Option<String>,
    pub currency: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub cost_per_unit: Decimal,
    pub current_price: Option<Decimal>,
    pub current_value: Decimal,
    pub last_price_at: Option<DateTime<Utc>>,
    pub last_nav: Option<Decimal>,
    pub last_nav_date: Option<NaiveDate>,
    pub status: PositionStatus,
    pub commitment_id: Option<String>,
    pub acquired_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Position {
    pub fn is_active(&self) -> bool {
        self.status == PositionStatus::Active
    }

    pub fn is_liquid(&self) -> bool {
        self.asset_class.is_liquid()
    }

    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        let nav_at = self
            .last_nav_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        Freshness::from_timestamp(self.last_price_at.or(nav_at), now)
    }
}

/// `current_value - cost_basis` in the position currency.
pub fn unrealized_gain(position: &Position) -> Decimal {
    position.current_value - position.cost_basis
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub id: Option<String>,
    pub entity_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: AssetClass,
    pub sub_class: Option<String>,
    pub currency: String,
    pub commitment_id: Option<String>,
    pub acquired_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewPosition {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        if self.entity_id.trim().is_empty() {
            return Err(ValidationError::MissingField("entityId".to_string()));
        }
        if self.currency.len() != 3 {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid currency '{}'",
                self.currency
            )));
        }
        Ok(())
    }
}

/// Descriptive fields a user may edit directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub asset_class: AssetClass,
    pub sub_class: Option<String>,
    pub commitment_id: Option<String>,
    pub notes: Option<String>,
}

/// Price fields written by the valuation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationUpdate {
    pub current_price: Option<Decimal>,
    pub current_value: Decimal,
    pub last_price_at: Option<DateTime<Utc>>,
    pub last_nav: Option<Decimal>,
    pub last_nav_date: Option<NaiveDate>,
}
