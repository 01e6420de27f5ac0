//! Column codecs shared by the repositories.
//!
//! Decimals are stored as TEXT so no precision is lost. Closed enums are
//! stored by display name.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::StorageError;

/// Parses a stored decimal, accepting scientific notation through `f64`.
/// Unreadable values are logged and read as zero.
pub fn parse_decimal(value: &str, field: &str) -> Decimal {
    if let Ok(d) = Decimal::from_str(value) {
        return d;
    }
    match f64::from_str(value).ok().and_then(Decimal::from_f64) {
        Some(d) => d,
        None => {
            log::error!("Failed to parse {} '{}' as a decimal, using 0", field, value);
            Decimal::ZERO
        }
    }
}

pub fn parse_optional_decimal(value: Option<&str>, field: &str) -> Option<Decimal> {
    value.map(|v| parse_decimal(v, field))
}

pub fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn optional_decimal_text(value: Option<Decimal>) -> Option<String> {
    value.map(decimal_text)
}

/// Parses a stored enum label. Unknown labels are a decode error, never a
/// silent default.
pub fn parse_enum<T>(value: &str, field: &str) -> Result<T, StorageError>
where
    T: FromStr,
    T::Err: Display,
{
    T::from_str(value).map_err(|e| StorageError::Decode(format!("{} '{}': {}", field, value, e)))
}

pub fn to_utc(value: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(value, Utc)
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
