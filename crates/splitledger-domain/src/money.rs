//! Fixed-point money values in integer minor units.
//!
//! All arithmetic stays in minor units (e.g. cents) until formatting; no
//! floating point is used for sums or comparisons. Percentages are carried
//! as basis points so weighted shares stay integral too.

use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO-style three-letter currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    /// Parses a three-letter uppercase ASCII code.
    pub fn from_code(code: &str) -> Result<Self, MoneyError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(MoneyError::InvalidCurrency(code.to_string()));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }

    pub fn as_str(&self) -> &str {
        // Constructed only from validated ASCII.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::from_code(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.as_str().to_string()
    }
}

/// Allocation percentage stored as basis points (1% == 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u32);

/// Basis points in a whole (100%).
pub const FULL_SHARE_BASIS_POINTS: u32 = 10_000;

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const FULL: Percentage = Percentage(FULL_SHARE_BASIS_POINTS);

    pub fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    pub fn from_percent(percent: u32) -> Self {
        Self(percent * 100)
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

/// Monetary amount in minor units of a single currency.
///
/// Negative amounts are representable (net balances need them); operations
/// that require non-negative input validate explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub minor_units: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    pub fn is_negative(&self) -> bool {
        self.minor_units < 0
    }

    /// Fails with `InvalidAmount` when the amount is negative. Used where the
    /// domain requires non-negative money (expense amounts, transfer amounts).
    pub fn ensure_non_negative(self) -> Result<Self, MoneyError> {
        if self.is_negative() {
            return Err(MoneyError::InvalidAmount(self.minor_units));
        }
        Ok(self)
    }

    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.combine(other, i64::checked_add)
    }

    pub fn checked_sub(self, other: Money) -> Result<Money, MoneyError> {
        self.combine(other, i64::checked_sub)
    }

    fn combine(
        self,
        other: Money,
        op: impl FnOnce(i64, i64) -> Option<i64>,
    ) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(self.currency, other.currency));
        }
        let minor_units =
            op(self.minor_units, other.minor_units).ok_or(MoneyError::Overflow)?;
        Ok(Money::new(minor_units, self.currency))
    }

    /// Multiplies by a percentage, rounding to the nearest minor unit with
    /// round-half-to-even. Callers splitting one total across several shares
    /// must re-distribute any residual units so the shares sum exactly.
    pub fn multiply_by_percentage(self, percentage: Percentage) -> Money {
        let numerator = self.minor_units as i128 * percentage.basis_points() as i128;
        let divisor = FULL_SHARE_BASIS_POINTS as i128;
        let quotient = numerator.div_euclid(divisor);
        let remainder = numerator.rem_euclid(divisor);
        let rounded = match (remainder * 2).cmp(&divisor) {
            std::cmp::Ordering::Less => quotient,
            std::cmp::Ordering::Greater => quotient + 1,
            std::cmp::Ordering::Equal => {
                if quotient % 2 == 0 {
                    quotient
                } else {
                    quotient + 1
                }
            }
        };
        Money::new(rounded as i64, self.currency)
    }

    /// Orders two amounts of the same currency; comparing across currencies
    /// is a caller error.
    pub fn compare(self, other: Money) -> Result<std::cmp::Ordering, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(self.currency, other.currency));
        }
        Ok(self.minor_units.cmp(&other.minor_units))
    }

}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let magnitude = self.minor_units.unsigned_abs();
        write!(
            f,
            "{}{}.{:02} {}",
            sign,
            magnitude / 100,
            magnitude % 100,
            self.currency
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised by money construction and arithmetic.
pub enum MoneyError {
    /// A negative amount was supplied where non-negative money is required.
    InvalidAmount(i64),
    /// A currency code failed to parse.
    InvalidCurrency(String),
    /// Two amounts in different currencies were combined.
    CurrencyMismatch(Currency, Currency),
    /// Arithmetic exceeded the representable range of minor units.
    Overflow,
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::InvalidAmount(units) => {
                write!(f, "invalid amount: {units} minor units (must be non-negative)")
            }
            MoneyError::InvalidCurrency(code) => {
                write!(f, "invalid currency code: {code:?}")
            }
            MoneyError::CurrencyMismatch(a, b) => {
                write!(f, "cannot combine amounts in {a} and {b}")
            }
            MoneyError::Overflow => f.write_str("money arithmetic overflowed"),
        }
    }
}

impl std::error::Error for MoneyError {}
