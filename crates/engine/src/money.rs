use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use crate::EngineError;

/// Money amount represented as **integer hundredths**.
///
/// This is the in-memory form of a `NUMERIC(12, 2)` column: exact, two
/// fractional digits, at most ten integer digits once stored.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(42_50);
/// assert_eq!(amount.minor(), 4250);
/// assert_eq!(amount.to_string(), "42.50");
/// assert_eq!("12.5".parse::<Money>().unwrap().minor(), 1250);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest value a `NUMERIC(12, 2)` column holds.
    pub const MAX_STORABLE: Money = Money(999_999_999_999);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole currency units (e.g. a spending goal) as money.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the raw value in hundredths.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn is_storable(self) -> bool {
        self.0.unsigned_abs() <= Self::MAX_STORABLE.0.unsigned_abs()
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses an unsigned decimal string with at most 2 fractional digits.
    ///
    /// No sign, no thousands separators, no surrounding whitespace: this is
    /// the monetary shape the insert validator admits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s:?}"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let (units_str, frac_str) = match s.split_once('.') {
            Some((units, frac)) => (units, Some(frac)),
            None => (s, None),
        };

        if units_str.is_empty() || !units_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let hundredths: i64 = match frac_str {
            None => 0,
            Some(frac) if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid());
            }
            Some(frac) => match frac.len() {
                1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                2 => frac.parse::<i64>().map_err(|_| invalid())?,
                _ => return Err(invalid()),
            },
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(hundredths))
            .map(Money)
            .ok_or_else(overflow)
    }
}
