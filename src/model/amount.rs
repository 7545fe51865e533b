//! Amount type for handling monetary values with optional dollar signs.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a dollar sign and thousands-separator commas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a dollar amount.
///
/// This type wraps `Decimal` so that user-typed strings like `$1,234.50` parse to an exact
/// numeric value. Amounts cross the database boundary as `f64` because the ledger stores them
/// in a REAL column.
///
/// # Examples
///
/// ```
/// # use budget_book::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,250.00").unwrap();
/// assert_eq!(amount.to_string(), "-$1,250.00");
/// assert_eq!(amount, Amount::from_str("-1250").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the value as `f64` for storage in a REAL column.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or_default()
    }

    /// Creates an Amount from a REAL column value.
    pub fn from_f64(value: f64) -> Self {
        Self {
            value: Decimal::from_f64_retain(value).unwrap_or_default(),
        }
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.is_zero()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(String);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError("An empty string is not an amount".into()));
        }

        // Remove the dollar sign, which may appear before or after a minus sign.
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousands separators).
        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError(format!("Invalid amount '{s}': {e}")))?;
        Ok(Amount { value })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.value.abs())
        } else {
            ("", self.value)
        };
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
