use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Date pattern accepted and produced at every boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field-level validation failures raised on construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("invalid price '{input}': {reason}")]
    InvalidPrice { input: String, reason: &'static str },

    #[error("invalid stock '{input}': {reason}")]
    InvalidStock { input: String, reason: &'static str },

    #[error("invalid date '{0}': expected format YYYY-MM-DD")]
    InvalidDate(String),

    #[error("plain products carry no date")]
    NoDateField,
}

/// A unit price, always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice {
                input: value.to_string(),
                reason: "must be greater than 0",
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.0))
    }
}

/// Units on hand, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stock(i32);

impl Stock {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < 0 {
            return Err(ValidationError::InvalidStock {
                input: value.to_string(),
                reason: "must not be negative",
            });
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidStock {
                input: value.to_string(),
                reason: "exceeds the storable range",
            })
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Parse a textual price; rejects non-numeric input and anything <= 0.
pub fn validate_price(raw: &str) -> Result<Price, ValidationError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| ValidationError::InvalidPrice {
        input: trimmed.to_string(),
        reason: "not a number",
    })?;
    Price::new(value)
}

/// Parse a textual stock count; rejects fractions, negatives and overflow.
pub fn validate_stock(raw: &str) -> Result<Stock, ValidationError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidStock {
        input: trimmed.to_string(),
        reason: "not a whole number",
    })?;
    Stock::new(value)
}

/// Parse a calendar date written as `YYYY-MM-DD`.
pub fn validate_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

pub(crate) fn require_non_empty(
    field: &'static str,
    raw: &str,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Canonical display form of names and origins: each word capitalized, the
/// rest lowercased, runs of whitespace collapsed.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders an amount with exactly two decimals.
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
