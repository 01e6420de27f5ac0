//! Transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transactions_constants::TRANSACTION_TYPE_MAPPING;
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Distribution,
    #[serde(rename = "Capital Call")]
    CapitalCall,
    #[serde(rename = "Capital Return")]
    CapitalReturn,
    Interest,
    Fee,
    #[serde(rename = "Transfer In")]
    TransferIn,
    #[serde(rename = "Transfer Out")]
    TransferOut,
    Valuation,
}

/// How a transaction moves quantity and cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEffect {
    Acquire,
    Dispose,
    Neutral,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "Buy",
            TransactionType::Sell => "Sell",
            TransactionType::Dividend => "Dividend",
            TransactionType::Distribution => "Distribution",
            TransactionType::CapitalCall => "Capital Call",
            TransactionType::CapitalReturn => "Capital Return",
            TransactionType::Interest => "Interest",
            TransactionType::Fee => "Fee",
            TransactionType::TransferIn => "Transfer In",
            TransactionType::TransferOut => "Transfer Out",
            TransactionType::Valuation => "Valuation",
        }
    }

    pub fn ledger_effect(&self) -> LedgerEffect {
        match self {
            TransactionType::Buy | TransactionType::CapitalCall | TransactionType::TransferIn => {
                LedgerEffect::Acquire
            }
            TransactionType::Sell
            | TransactionType::CapitalReturn
            | TransactionType::TransferOut => LedgerEffect::Dispose,
            _ => LedgerEffect::Neutral,
        }
    }

    /// Sign of the investor cash flow for IRR purposes, `None` when the
    /// transaction moves no external cash.
    pub fn cash_flow_sign(&self) -> Option<Decimal> {
        match self {
            TransactionType::Buy | TransactionType::CapitalCall | TransactionType::Fee => {
                Some(Decimal::NEGATIVE_ONE)
            }
            TransactionType::Sell
            | TransactionType::CapitalReturn
            | TransactionType::Dividend
            | TransactionType::Distribution
            | TransactionType::Interest => Some(Decimal::ONE),
            TransactionType::TransferIn
            | TransactionType::TransferOut
            | TransactionType::Valuation => None,
        }
    }

    /// Dividends, distributions and interest.
    pub fn is_income(&self) -> bool {
        matches!(
            self,
            TransactionType::Dividend | TransactionType::Distribution | TransactionType::Interest
        )
    }

    /// Maps an import label onto a type. Unknown labels are rejected.
    pub fn normalize(raw: &str) -> Result<TransactionType, ValidationError> {
        raw.parse()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        TRANSACTION_TYPE_MAPPING
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, t)| *t)
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!("Unknown transaction type '{}'", s))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub position_id: String,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub price_per_unit: Option<Decimal>,
    pub total_amount: Decimal,
    pub currency: String,
    pub fees: Decimal,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub position_id: String,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub price_per_unit: Option<Decimal>,
    /// When zero and a unit price is given, derived as quantity x price.
    pub total_amount: Decimal,
    pub currency: String,
    pub fees: Decimal,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_amounts(
            self.quantity,
            self.price_per_unit,
            self.total_amount,
            self.fees,
            &self.currency,
        )
    }

    /// Fills `total_amount` from quantity and price when it was left at zero.
    pub fn with_derived_total(mut self) -> Self {
        if self.total_amount.is_zero() {
            if let Some(price) = self.price_per_unit {
                self.total_amount = self.quantity * price;
            }
        }
        self
    }
}

/// Full replacement of an existing transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: String,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub price_per_unit: Option<Decimal>,
    pub total_amount: Decimal,
    pub currency: String,
    pub fees: Decimal,
    pub notes: Option<String>,
}

impl TransactionUpdate {
    /// Same derivation as [`NewTransaction::with_derived_total`].
    pub fn with_derived_total(mut self) -> Self {
        if self.total_amount.is_zero() {
            if let Some(price) = self.price_per_unit {
                self.total_amount = self.quantity * price;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_amounts(
            self.quantity,
            self.price_per_unit,
            self.total_amount,
            self.fees,
            &self.currency,
        )
    }
}

fn validate_amounts(
    quantity: Decimal,
    price_per_unit: Option<Decimal>,
    total_amount: Decimal,
    fees: Decimal,
    currency: &str,
) -> Result<(), ValidationError> {
    if quantity < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Quantity must be non-negative, got {}",
            quantity
        )));
    }
    if let Some(price) = price_per_unit {
        if price < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Price per unit must be non-negative, got {}",
                price
            )));
        }
    }
    if total_amount < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Total amount must be non-negative, got {}",
            total_amount
        )));
    }
    if fees < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Fees must be non-negative, got {}",
            fees
        )));
    }
    if currency.len() != 3 {
        return Err(ValidationError::InvalidInput(format!(
            "Invalid currency '{}'",
            currency
        )));
    }
    Ok(())
}
