//! Lenient scalars for loosely typed remote JSON fields.
//!
//! The mock REST store does not enforce field types: stock arrives as a
//! number or a string, prices as decimal strings, and the admin flag as a
//! checkbox value of whatever shape the form submitted. These wrappers keep
//! the raw value intact for round-tripping (persisted snapshots must not
//! invent types the remote never sent) and expose typed accessors that
//! normalize at the point of use.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The remote admin-checkbox field, in whatever shape it was stored.
///
/// `is_set()` applies boolean coercion: `false`, `0`, `""`, and `null` are
/// unset; everything else counts as set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdminFlag {
    /// A proper boolean.
    Bool(bool),
    /// A numeric flag (0 = unset).
    Number(f64),
    /// A string flag (empty = unset).
    Text(String),
    /// Anything else the form managed to store.
    Other(Value),
}

impl AdminFlag {
    /// Whether the flag counts as set under boolean coercion.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Other(v) => !v.is_null(),
        }
    }
}

impl Default for AdminFlag {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl From<bool> for AdminFlag {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A stock field as stored remotely: integer, float, or digit string.
///
/// `parse()` yields the stock ceiling as a non-negative integer, or `None`
/// when the raw value is unparsable or negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockValue {
    /// An integer count.
    Int(i64),
    /// A float count (truncated toward zero, as integer parsing would).
    Float(f64),
    /// A string count; only a leading integer prefix is honored.
    Text(String),
    /// Anything else - never parsable.
    Other(Value),
}

impl StockValue {
    /// Parse the stock ceiling.
    ///
    /// Returns `None` for unparsable values and for negative counts, which
    /// the cart treats as invalid stock rather than zero.
    #[must_use]
    pub fn parse(&self) -> Option<u32> {
        match self {
            Self::Int(i) => u32::try_from(*i).ok(),
            Self::Float(f) => {
                let t = f.trunc();
                if t.is_nan() || t < 0.0 || t > f64::from(u32::MAX) {
                    None
                } else {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let truncated = t as u32;
                    Some(truncated)
                }
            }
            Self::Text(s) => parse_leading_int(s),
            Self::Other(_) => None,
        }
    }
}

impl Default for StockValue {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl From<u32> for StockValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

/// Parse a leading non-negative integer prefix, e.g. `" 12 units"` -> 12.
///
/// A leading minus sign parses as a negative count, which is invalid.
fn parse_leading_int(s: &str) -> Option<u32> {
    let t = s.trim_start();
    let (negative, t) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };

    let digits: String = t.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() || negative {
        return None;
    }
    digits.parse().ok()
}

/// A unit-price field as stored remotely: number or decimal string.
///
/// `parse()` yields an exact `Decimal`; an absent or unparsable price is
/// treated as zero by cart totals, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    /// An integer amount.
    Int(i64),
    /// A float amount.
    Number(f64),
    /// A decimal string, e.g. `"5.005"` - parsed exactly, no float detour.
    Text(String),
    /// Anything else - treated as zero.
    Other(Value),
}

impl PriceValue {
    /// Parse the unit price as an exact decimal.
    #[must_use]
    pub fn parse(&self) -> Option<Decimal> {
        match self {
            Self::Int(i) => Some(Decimal::from(*i)),
            Self::Number(f) => Decimal::try_from(*f).ok(),
            Self::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    t.parse().ok()
                }
            }
            Self::Other(_) => None,
        }
    }

    /// The parsed price, with absent or unparsable values counted as zero.
    #[must_use]
    pub fn or_zero(&self) -> Decimal {
        self.parse().unwrap_or(Decimal::ZERO)
    }
}

impl Default for PriceValue {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}
