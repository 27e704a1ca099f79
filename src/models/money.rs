//! Money type for prices and transaction amounts
//!
//! Internally stores amounts in cents (i64) so that income/expense totals and
//! net profit are exact. Callers hand us decimals (JSON numbers, CLI strings);
//! those are rounded to the nearest cent once, at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from callers: 999,999,999,999.99
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use stockbook::models::Money;
    /// let price = Money::from_cents(99999); // 999.99
    /// assert_eq!(price.to_plain_string(), "999.99");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Convert a decimal amount (e.g. `999.99`) to Money, rounding to the nearest cent
    pub fn from_decimal(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() {
            return Err(MoneyParseError::NotFinite);
        }
        let cents = (value * 100.0).round();
        if cents.abs() > Self::MAX.0 as f64 {
            return Err(MoneyParseError::OutOfRange);
        }
        Ok(Self(cents as i64))
    }

    /// The amount as a decimal number, for JSON output
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a decimal string such as "12.5", "$4.99" or "-3"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let to_cents = |units: i64, fraction: i64| {
            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(fraction))
                .filter(|c| *c <= Self::MAX.0)
                .ok_or(MoneyParseError::OutOfRange)
        };

        let cents = match s.split_once('.') {
            Some((units, fraction)) => {
                let units: i64 = if units.is_empty() {
                    0
                } else {
                    units.parse().map_err(|_| invalid())?
                };
                if !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                // Round half up on the third fractional digit
                let mut digits: Vec<i64> = fraction
                    .chars()
                    .filter_map(|c| c.to_digit(10))
                    .map(i64::from)
                    .collect();
                digits.resize(digits.len().max(3), 0);
                let mut fraction_cents = digits[0] * 10 + digits[1];
                if digits[2] >= 5 {
                    fraction_cents += 1;
                }
                to_cents(units, fraction_cents)?
            }
            None => to_cents(s.parse::<i64>().map_err(|_| invalid())?, 0)?,
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Sum of two amounts, `None` on overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Difference of two amounts, `None` on overflow
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Total of a sequence of amounts, `None` on overflow
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, m| acc.checked_add(m))
    }

    /// Format without a currency symbol ("999.99"), as used in CSV output
    pub fn to_plain_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.units().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

/// Serialize as a decimal number (`999.99`) instead of cents, for
/// caller-facing output. Use with `#[serde(serialize_with = ...)]`.
pub fn serialize_decimal<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(money.as_decimal())
}

/// Error type for money conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    NotFinite,
    OutOfRange,
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::NotFinite => write!(f, "Amount must be a finite number"),
            MoneyParseError::OutOfRange => write!(f, "Amount is out of range"),
        }
    }
}

impl std::error::Error for MoneyParseError {}
