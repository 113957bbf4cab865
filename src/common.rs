//! Numeric input helpers shared across handlers and the CLI
//!
//! Back-office operators type volumes the Brazilian way (`1.234,56`,
//! `R$ 12,50`), while API clients send plain JSON numbers. Both land here.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use thiserror::Error;
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a valid number")]
pub struct LocaleNumberError {
    pub input: String,
}

/// Parses a locale-formatted decimal.
///
/// Blank input is `Ok(None)`. When both `.` and `,` appear, dots are
/// thousands separators and the comma is the decimal mark. A lone comma is the
/// decimal mark; a lone dot is the decimal point.
pub fn parse_locale_decimal(raw: &str) -> Result<Option<Decimal>, LocaleNumberError> {
    let trimmed = raw.trim();
    let without_currency = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();
    if without_currency.is_empty() {
        return Ok(None);
    }

    let normalized = if without_currency.contains('.') && without_currency.contains(',') {
        without_currency.replace('.', "").replace(',', ".")
    } else {
        without_currency.replace(',', ".")
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map(Some)
        .map_err(|_| LocaleNumberError {
            input: raw.to_string(),
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Text(String),
    Number(serde_json::Number),
}

impl RawNumber {
    fn into_decimal(self) -> Result<Option<Decimal>, LocaleNumberError> {
        match self {
            RawNumber::Text(text) => parse_locale_decimal(&text),
            RawNumber::Number(number) => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Some)
                    .map_err(|_| LocaleNumberError { input: text })
            }
        }
    }
}

/// `deserialize_with` for optional numeric fields; `null` and `""` are absent.
pub fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => raw.into_decimal().map_err(serde::de::Error::custom),
    }
}

/// `deserialize_with` for required numeric fields.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    RawNumber::deserialize(deserializer)?
        .into_decimal()
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("a number is required"))
}

/// Fractional digits kept by every numeric column.
pub const STORED_SCALE: u32 = 4;
/// Integer digits of the `Decimal(14, 4)` volume columns.
pub const VOLUME_INTEGER_DIGITS: u32 = 10;
/// Integer digits of the `Decimal(8, 4)` temperature and density columns.
pub const MEASUREMENT_INTEGER_DIGITS: u32 = 4;

/// Whether `value` can be stored in a `Decimal(integer_digits + 4, 4)` column
/// without rounding or overflow.
pub fn fits_column(value: &Decimal, integer_digits: u32) -> bool {
    let limit = Decimal::from(10u64.pow(integer_digits));
    value.abs() < limit && value.normalize().scale() <= STORED_SCALE
}

fn check_column(value: &Decimal, integer_digits: u32) -> Result<(), ValidationError> {
    if fits_column(value, integer_digits) {
        return Ok(());
    }
    let mut err = ValidationError::new("decimal_out_of_range");
    err.message = Some(
        format!(
            "Value must be below 10^{} with at most {} decimal places",
            integer_digits, STORED_SCALE
        )
        .into(),
    );
    Err(err)
}

/// Readings, refuels and stage volumes.
pub fn validate_volume(value: &Decimal) -> Result<(), ValidationError> {
    validate_decimal_non_negative(value)?;
    check_column(value, VOLUME_INTEGER_DIGITS)
}

/// Declared freight volume.
pub fn validate_positive_volume(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive_decimal(value)?;
    check_column(value, VOLUME_INTEGER_DIGITS)
}

/// Temperature may be negative.
pub fn validate_temperature(value: &Decimal) -> Result<(), ValidationError> {
    check_column(value, MEASUREMENT_INTEGER_DIGITS)
}

pub fn validate_density(value: &Decimal) -> Result<(), ValidationError> {
    validate_decimal_non_negative(value)?;
    check_column(value, MEASUREMENT_INTEGER_DIGITS)
}

pub fn validate_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("decimal_non_negative");
        err.message = Some("Value must not be negative".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("Value must be greater than 0".into());
        Err(err)
    }
}
