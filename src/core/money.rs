//! Exact fixed-point money.
//!
//! Every amount inside the ledger is an `i64` count of minor units (cents).
//! Decimal text only exists at the edges: [`MonetaryAmount::parse_decimal`]
//! turns it into minor units and [`MonetaryAmount::format`] renders it back.
//! No floating point value ever takes part in the arithmetic.

use crate::core::errors::LedgerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use utoipa::ToSchema;

/// Minor units per whole currency unit.
pub const MINOR_PER_UNIT: i64 = 100;

/// Number of fractional digits carried by the decimal representation.
pub const FRACTION_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = String, example = "10.00")]
pub struct MonetaryAmount(i64);

impl MonetaryAmount {
    pub const fn zero() -> Self {
        MonetaryAmount(0)
    }

    pub const fn from_minor(minor: i64) -> Self {
        MonetaryAmount(minor)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Option<Self> {
        self.0.checked_abs().map(MonetaryAmount)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(MonetaryAmount)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(MonetaryAmount)
    }

    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(MonetaryAmount::zero(), MonetaryAmount::checked_add)
    }

    /// Parses a decimal currency value with at most two fractional digits.
    ///
    /// The text is split on the decimal point and both halves are read as
    /// integers: `whole * 100 + fraction`, with the sign applied last. The
    /// same rule covers every sign and magnitude (`"0.05"`, `"-0.05"`,
    /// `"5"`, `"1234.5"`).
    pub fn parse_decimal(input: &str) -> Result<Self, LedgerError> {
        let text = input.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (unsigned, None),
        };

        if whole.is_empty() && fraction.is_none_or(str::is_empty) {
            return Err(invalid(input, "no digits"));
        }
        if fraction == Some("") {
            return Err(invalid(input, "missing fractional digits"));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !fraction.is_none_or(all_digits) {
            return Err(invalid(input, "not a decimal number"));
        }

        let fraction_units = match fraction {
            None => 0,
            Some(digits) if digits.len() > FRACTION_DIGITS => {
                return Err(invalid(input, "more than two fractional digits"));
            }
            // A single digit is tenths: ".5" is 50 minor units.
            Some(digits) if digits.len() == 1 => read_digits(input, digits)? * 10,
            Some(digits) => read_digits(input, digits)?,
        };

        let magnitude = read_digits(input, whole)?
            .checked_mul(MINOR_PER_UNIT)
            .and_then(|units| units.checked_add(fraction_units))
            .ok_or_else(|| invalid(input, "out of range"))?;

        Ok(MonetaryAmount(if negative { -magnitude } else { magnitude }))
    }

    /// Accepts a numeric input by reading its shortest decimal rendering with
    /// the text rule, so `0.07` parses as 7 minor units and `0.1 + 0.2` is
    /// rejected instead of rounded.
    pub fn from_number(value: f64) -> Result<Self, LedgerError> {
        if !value.is_finite() {
            return Err(invalid(&value.to_string(), "not a finite number"));
        }
        Self::parse_decimal(&value.to_string())
    }

    /// Renders exactly two fractional digits, keeping the sign.
    pub fn format(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_unit = MINOR_PER_UNIT.unsigned_abs();
        format!("{}{}.{:02}", sign, magnitude / per_unit, magnitude % per_unit)
    }

    /// Splits the amount into `parts` shares that sum exactly to `self`.
    ///
    /// The remainder of the integer division is handed out one minor unit at
    /// a time to the leading shares. Returns `None` when `parts` is zero.
    pub fn split_evenly(self, parts: usize) -> Option<Vec<MonetaryAmount>> {
        if parts == 0 {
            return None;
        }
        let magnitude = self.0.unsigned_abs();
        let count = u64::try_from(parts).ok()?;
        let base = magnitude / count;
        let remainder = magnitude % count;

        (0..count)
            .map(|index| {
                let share = i128::from(base + u64::from(index < remainder));
                let signed = if self.0 < 0 { -share } else { share };
                i64::try_from(signed).ok().map(MonetaryAmount)
            })
            .collect()
    }
}

fn invalid(input: &str, reason: &str) -> LedgerError {
    LedgerError::InvalidAmount(format!("`{}`: {}", input, reason))
}

fn read_digits(input: &str, digits: &str) -> Result<i64, LedgerError> {
    digits.bytes().try_fold(0i64, |acc, digit| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(i64::from(digit - b'0')))
            .ok_or_else(|| invalid(input, "out of range"))
    })
}

impl Neg for MonetaryAmount {
    type Output = MonetaryAmount;

    fn neg(self) -> Self::Output {
        MonetaryAmount(-self.0)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for MonetaryAmount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonetaryAmount::parse_decimal(s)
    }
}

impl Serialize for MonetaryAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Whole(i64),
    Number(f64),
}

impl<'de> Deserialize<'de> for MonetaryAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match DecimalInput::deserialize(deserializer)? {
            DecimalInput::Text(text) => MonetaryAmount::parse_decimal(&text),
            DecimalInput::Whole(units) => units
                .checked_mul(MINOR_PER_UNIT)
                .map(MonetaryAmount)
                .ok_or_else(|| invalid(&units.to_string(), "out of range")),
            DecimalInput::Number(value) => MonetaryAmount::from_number(value),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
