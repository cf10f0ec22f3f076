//! Arbitrary-precision decimal numbers carried as validated text.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::errors::Error;

/// An arbitrary-precision decimal number.
///
/// The number is kept in its textual form so no precision or scale is lost
/// between the backend and the generated SQL. Two decimals are equal when
/// their canonical text is equal, so `1.10` and `1.1` differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(String);

impl Decimal {
    /// Returns the canonical text of the number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn is_decimal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let integral = digits(&bytes[pos..]);
    pos += integral;
    let mut fractional = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        fractional = digits(&bytes[pos..]);
        pos += fractional;
    }
    if integral + fractional == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exponent = digits(&bytes[pos..]);
        if exponent == 0 {
            return false;
        }
        pos += exponent;
    }
    pos == bytes.len()
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if !is_decimal(trimmed) {
            return Err(Error::InvalidDecimal(text.to_string()));
        }
        Ok(Self(trimmed.strip_prefix('+').unwrap_or(trimmed).to_string()))
    }
}

impl TryFrom<&str> for Decimal {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
