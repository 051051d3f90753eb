//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Every amount is rounded to the minor unit when it is parsed, so
//! nothing downstream ever sees fractional cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Smallest amount a budget may be created with (0.01)
    pub const MIN_BUDGET: Money = Money(1);

    /// Largest amount a budget may be created with (99,999,999,999.99)
    pub const MAX_BUDGET: Money = Money(9_999_999_999_999);

    /// Largest amount a single transaction may carry (99,999,999,999.99)
    pub const MAX_TRANSACTION: Money = Money(9_999_999_999_999);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use envelope_wizard::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add, returning `None` on overflow
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Add, clamping at the representable bounds
    pub const fn saturating_add(self, other: Money) -> Money {
        Self(self.0.saturating_add(other.0))
    }

    /// `self / whole` as a fraction, or `None` when `whole` is not positive
    pub fn ratio_of(&self, whole: Money) -> Option<f64> {
        if whole.is_positive() {
            Some(self.0 as f64 / whole.0 as f64)
        } else {
            None
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "-$10.50", "10", "1,250.00".
    /// Digits past the second decimal place are rounded half away from zero.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        Self::parse_with_symbol(s, "$")
    }

    /// Parse a money amount that may carry `symbol` as its currency prefix
    ///
    /// Only a leading `-` and then `symbol` are stripped. Anything else in
    /// front of the digits is rejected.
    pub fn parse_with_symbol(s: &str, symbol: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();

        // Handle negative sign at start
        let (negative, s) = if let Some(stripped) = original.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, original)
        };

        // Remove currency symbol if present, then grouping separators
        let s = if symbol.is_empty() {
            s
        } else {
            s.strip_prefix(symbol).map(str::trim_start).unwrap_or(s)
        };
        let s: String = s.chars().filter(|c| *c != ',').collect();

        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        if !s.chars().all(|c| c.is_ascii_digit() || c == '.')
            || !s.chars().any(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let cents = match s.split_once('.') {
            Some((whole, frac)) => {
                if frac.contains('.') || !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let dollars: i64 = if whole.is_empty() {
                    0
                } else {
                    whole.parse().map_err(|_| invalid())?
                };

                let digits: Vec<i64> = frac
                    .chars()
                    .map(|c| i64::from(c.to_digit(10).unwrap_or(0)))
                    .collect();
                let tenths = digits.first().copied().unwrap_or(0);
                let hundredths = digits.get(1).copied().unwrap_or(0);
                let round_up = digits.get(2).is_some_and(|d| *d >= 5);

                dollars
                    .checked_mul(100)
                    .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
                    .ok_or_else(invalid)?
            }
            None => s
                .parse::<i64>()
                .ok()
                .and_then(|d| d.checked_mul(100))
                .ok_or_else(invalid)?,
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.dollars().abs(),
                self.cents_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
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

impl std::str::FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.dollars(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
        assert_eq!(Money::from_cents(-10000).format_with_symbol("R$"), "-R$100.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-$10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse("1,250.00").unwrap().cents(), 125000);
    }

    #[test]
    fn test_parse_rounds_to_minor_unit() {
        assert_eq!(Money::parse("10.005").unwrap().cents(), 1001);
        assert_eq!(Money::parse("10.004").unwrap().cents(), 1000);
        assert_eq!(Money::parse("-0.129").unwrap().cents(), -13);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("1.x").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("+5").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_prefix() {
        assert!(Money::parse("abc5").is_err());
        assert!(Money::parse("$-5").is_err());
        assert!(Money::parse("$$5").is_err());
        assert!(Money::parse("€5").is_err());
    }

    #[test]
    fn test_parse_with_symbol() {
        assert_eq!(Money::parse_with_symbol("R$ 10.50", "R$").unwrap().cents(), 1050);
        assert_eq!(Money::parse_with_symbol("-€3", "€").unwrap().cents(), -300);
        assert!(Money::parse_with_symbol("$3", "€").is_err());
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_dollars(10);
        assert_eq!(a.checked_add(Money::from_cents(5)), Some(Money::from_cents(1005)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(i64::MAX).saturating_add(Money::from_cents(1)),
            Money::from_cents(i64::MAX)
        );
    }

    #[test]
    fn test_ratio_of() {
        let spent = Money::from_dollars(800);
        assert_eq!(spent.ratio_of(Money::from_dollars(1000)), Some(0.8));
        assert_eq!(spent.ratio_of(Money::zero()), None);
    }

    #[test]
    fn test_budget_bounds() {
        assert_eq!(Money::MIN_BUDGET.to_string(), "$0.01");
        assert_eq!(Money::MAX_BUDGET.to_string(), "$99999999999.99");
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
