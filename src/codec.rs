//! Rendering of values and identifiers into backend SQL text.
//!
//! A [`ValueCodec`] belongs to an open session: adapters only hand one out
//! while connected, because correct escaping depends on the backend and on
//! the session character set.

use alloc::format;
use alloc::string::{String, ToString};

use crate::errors::Error;
use crate::value::Value;

/// Declared type names (lowercase, without precision) compared through a
/// numeric cast when matching rows.
const NUMERIC_TYPES: &[&str] = &[
    "numeric",
    "decimal",
    "real",
    "float",
    "float4",
    "float8",
    "double",
    "double precision",
    "money",
];

/// Canonical text rendering of dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical text rendering of times of day.
pub const TIME_FORMAT: &str = "%H:%M:%S%.f";
/// Canonical text rendering of timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Backend-specific rendering of identifiers and literals.
pub trait ValueCodec {
    /// Quotes a table or column name.
    fn quote_identifier(&self, identifier: &str) -> String;

    /// Quotes a string literal.
    fn quote_literal(&self, literal: &str) -> String;

    /// Name of the backend's internal physical row identifier, used to pin
    /// updates and deletes of identity-less rows to a single row.
    fn row_locator(&self) -> &str;

    /// The NULL literal.
    fn null_literal(&self) -> &str {
        "NULL"
    }

    /// Boolean literal.
    fn boolean_literal(&self, value: bool) -> &str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// Binary literal for a byte sequence, hex-encoded.
    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("X'{}'", hex::encode_upper(bytes))
    }

    /// Wraps an expression in a numeric cast.
    fn numeric_cast(&self, expression: &str) -> String {
        format!("CAST({expression} AS NUMERIC)")
    }

    /// Whether a declared column type belongs to the numeric, float or
    /// currency family whose comparisons need a cast on both sides.
    fn is_numeric_type(&self, declared: &str) -> bool {
        let base = declared.split('(').next().unwrap_or_default().trim();
        NUMERIC_TYPES
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(base))
    }

    /// Renders a value as a SQL literal.
    ///
    /// # Errors
    ///
    /// * `UnsupportedType` - If the value has no literal form, which is the case
    ///   for non-finite floats.
    fn value_to_literal(&self, value: &Value) -> Result<String, Error> {
        Ok(match value {
            Value::Null => self.null_literal().to_string(),
            Value::Boolean(v) => self.boolean_literal(*v).to_string(),
            Value::Integer(v) => v.to_string(),
            Value::BigInt(v) => v.to_string(),
            Value::Real(v) => {
                if !v.is_finite() {
                    return Err(Error::UnsupportedType(format!("non-finite float {v}")));
                }
                format!("{v:?}")
            }
            Value::Decimal(v) => v.to_string(),
            Value::Blob(v) => self.binary_literal(v),
            Value::Text(v) => self.quote_literal(v),
            Value::Date(v) => self.quote_literal(&v.format(DATE_FORMAT).to_string()),
            Value::Time(v) => self.quote_literal(&v.format(TIME_FORMAT).to_string()),
            Value::Timestamp(v) => self.quote_literal(&v.format(TIMESTAMP_FORMAT).to_string()),
            Value::Uuid(v) => self.quote_literal(&v.hyphenated().to_string()),
        })
    }
}

/// Quote `text` between `quote` characters, doubling embedded quotes.
pub(crate) fn quote_with(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    out
}
