//! Named query parameters substituted into SQL text as literals.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::codec::ValueCodec;
use crate::errors::Error;
use crate::record::ColumnMap;
use crate::value::Value;

/// Parameter name to value, in insertion order.
///
/// Names are matched verbatim, marker included (`@Name`, `:name`, `$1`).
/// Substitution is plain text replacement: a name also matches inside string
/// literals and comments of the statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: ColumnMap,
}

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Replaces every occurrence of every parameter name in `sql` with the
    /// literal of its value.
    ///
    /// The text is scanned once from left to right. At each position the
    /// longest matching name wins, so `@Id` never clobbers the prefix of
    /// `@IdList`; substituted literals are never scanned again. Empty names
    /// are ignored.
    ///
    /// # Errors
    ///
    /// * `UnsupportedType` - If a value has no literal form.
    pub fn substitute<C: ValueCodec + ?Sized>(
        &self,
        sql: &str,
        codec: &C,
    ) -> Result<String, Error> {
        let mut rendered = self
            .values
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| Ok((name.as_str(), codec.value_to_literal(value)?)))
            .collect::<Result<Vec<_>, Error>>()?;
        rendered.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        let mut out = String::with_capacity(sql.len());
        let mut rest = sql;
        'scan: while let Some(next) = rest.chars().next() {
            for (name, literal) in &rendered {
                if let Some(after) = rest.strip_prefix(name) {
                    out.push_str(literal);
                    rest = after;
                    continue 'scan;
                }
            }
            out.push(next);
            rest = &rest[next.len_utf8()..];
        }
        Ok(out)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        parameters.extend(iter);
        parameters
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Parameters {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl core::fmt::Display for Parameters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<String> = self.values.keys().map(ToString::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
