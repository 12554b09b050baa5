//! Money Representation
//!
//! Fixed-point amounts and currency codes. Amounts carry eight fractional
//! digits so that sums never pick up floating point drift.
//!
//! A single literal is limited to the `i64` range of units. Amounts are
//! stored as `i128`, so sums over any realistic number of postings cannot
//! overflow.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of fractional digits stored in an [`Amount`].
pub const SCALE_DIGITS: u32 = 8;

/// Units per whole currency unit.
pub const SCALE: i64 = 100_000_000;

/// Errors produced while reading an amount literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("`{0}` is not a digit")]
    InvalidDigit(char),

    #[error("missing digits after the decimal point")]
    MissingFraction,

    #[error("at most {max} fractional digits are allowed, found {found}")]
    TooPrecise { found: usize, max: u32 },

    #[error("amount does not fit in the ledger's range")]
    Overflow,
}

/// A signed fixed-point quantity with [`SCALE_DIGITS`] fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Builds an amount from raw fixed-point units.
    pub const fn from_units(units: i128) -> Self {
        Self(units)
    }

    /// Builds an amount from a whole number of currency units.
    ///
    /// # Example
    ///
    /// ```
    /// use hortela::ledger::Amount;
    ///
    /// assert_eq!(Amount::from_whole(3).to_string(), "3.00");
    /// ```
    pub fn from_whole(value: i64) -> Self {
        Self(value as i128 * SCALE as i128)
    }

    pub const fn units(self) -> i128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds half away from zero to `precision` fractional digits.
    pub fn round(self, precision: u32) -> Self {
        if precision >= SCALE_DIGITS {
            return self;
        }

        let step = 10_u128.pow(SCALE_DIGITS - precision);
        let magnitude = self.0.unsigned_abs().saturating_add(step / 2) / step * step;
        let magnitude = i128::try_from(magnitude).unwrap_or(i128::MAX);

        Self(if self.0 < 0 { -magnitude } else { magnitude })
    }

    /// Formats with exactly `precision` fractional digits, rounding first.
    pub fn format_fixed(self, precision: u32) -> String {
        let precision = precision.min(SCALE_DIGITS);
        let rounded = self.round(precision).0;
        let sign = if rounded < 0 { "-" } else { "" };
        let magnitude = rounded.unsigned_abs();
        let whole = magnitude / SCALE as u128;

        if precision == 0 {
            return format!("{}{}", sign, whole);
        }

        let fraction = (magnitude % SCALE as u128) / 10_u128.pow(SCALE_DIGITS - precision);
        format!(
            "{}{}.{:0width$}",
            sign,
            whole,
            fraction,
            width = precision as usize
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits, None),
        };

        if whole.is_empty() {
            return Err(AmountError::Empty);
        }

        if let Some(bad) = whole.chars().find(|c| !c.is_ascii_digit()) {
            return Err(AmountError::InvalidDigit(bad));
        }

        let mut units = whole
            .parse::<i64>()
            .map_err(|_| AmountError::Overflow)?
            .checked_mul(SCALE)
            .ok_or(AmountError::Overflow)?;

        if let Some(fraction) = fraction {
            if fraction.is_empty() {
                return Err(AmountError::MissingFraction);
            }
            if let Some(bad) = fraction.chars().find(|c| !c.is_ascii_digit()) {
                return Err(AmountError::InvalidDigit(bad));
            }
            if fraction.len() > SCALE_DIGITS as usize {
                return Err(AmountError::TooPrecise {
                    found: fraction.len(),
                    max: SCALE_DIGITS,
                });
            }

            let padded = format!("{:0<width$}", fraction, width = SCALE_DIGITS as usize);
            let fractional_units: i64 = padded.parse().map_err(|_| AmountError::Overflow)?;
            units = units
                .checked_add(fractional_units)
                .ok_or(AmountError::Overflow)?;
        }

        let units = units as i128;
        Ok(Self(if negative { -units } else { units }))
    }
}

/// Shows the exact value, trimming trailing zeros but keeping two decimals.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.format_fixed(SCALE_DIGITS);
        let (whole, fraction) = full.split_once('.').unwrap_or((full.as_str(), ""));
        let trimmed = fraction.trim_end_matches('0');

        if trimmed.len() >= 2 {
            write!(f, "{}.{}", whole, trimmed)
        } else {
            write!(f, "{}.{:0<2}", whole, trimmed)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Mul<i64> for Amount {
    type Output = Amount;

    fn mul(self, factor: i64) -> Amount {
        Amount(self.0 * factor as i128)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

/// An ISO-like currency code such as `BRL` or `USD`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount tagged with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    pub amount: Amount,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Amount, currency: impl Into<Currency>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Amount {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(amount("200"), Amount::from_whole(200));
        assert_eq!(amount("200.00"), Amount::from_whole(200));
        assert_eq!(amount("00200.00"), Amount::from_whole(200));
        assert_eq!(amount("200.01").units(), 20_001_000_000);
        assert_eq!(amount("0.00000001").units(), 1);
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(amount("-12.5"), -amount("12.5"));
        assert!(amount("-0.01").is_negative());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!(".5".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("12.".parse::<Amount>(), Err(AmountError::MissingFraction));
        assert_eq!("1a".parse::<Amount>(), Err(AmountError::InvalidDigit('a')));
        assert_eq!(
            "1.123456789".parse::<Amount>(),
            Err(AmountError::TooPrecise { found: 9, max: 8 })
        );
        assert_eq!(
            "99999999999999".parse::<Amount>(),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(amount("1.005").round(2), amount("1.01"));
        assert_eq!(amount("1.004").round(2), amount("1.00"));
        assert_eq!(amount("-1.005").round(2), amount("-1.01"));
        assert_eq!(amount("2.5").round(0), amount("3"));
        assert_eq!(amount("1.23").round(8), amount("1.23"));
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(amount("200").format_fixed(2), "200.00");
        assert_eq!(amount("-3.14159").format_fixed(3), "-3.142");
        assert_eq!(amount("0.5").format_fixed(0), "1");
        assert_eq!(amount("-0.001").format_fixed(2), "0.00");
    }

    #[test]
    fn test_display_trims_but_keeps_two_decimals() {
        assert_eq!(amount("100").to_string(), "100.00");
        assert_eq!(amount("100.5").to_string(), "100.50");
        assert_eq!(amount("0.125").to_string(), "0.125");
        assert_eq!(amount("-7.25").to_string(), "-7.25");
    }

    #[test]
    fn test_arithmetic() {
        let total: Amount = [amount("1.10"), amount("2.20"), amount("-0.30")].iter().sum();
        assert_eq!(total, amount("3"));
        assert_eq!(amount("2") * -1, amount("-2"));

        let mut running = Amount::ZERO;
        running += amount("5");
        running -= amount("1.5");
        assert_eq!(running, amount("3.5"));
    }

    #[test]
    fn test_sums_beyond_a_single_literal() {
        let big = Amount::from_units(i64::MAX as i128);
        let total: Amount = [big, big, big].iter().sum();

        assert_eq!(total.units(), 3 * i64::MAX as i128);
        assert_eq!(total - big - big, big);
        assert_eq!((-total).format_fixed(0), "-276701161106");
        assert_eq!(
            amount("50000000000") + amount("50000000000"),
            Amount::from_whole(100_000_000_000)
        );
    }

    #[test]
    fn test_money_display() {
        let money = Money::new(amount("10.5"), "BRL");
        assert_eq!(money.to_string(), "10.50 BRL");
        assert_eq!(money.currency.as_str(), "BRL");
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(amount("1.5"), "USD")).unwrap();
        assert_eq!(json, r#"{"amount":"1.50","currency":"USD"}"#);
    }
}
