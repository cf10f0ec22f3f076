//! Column maps and the record source a backend hands back from a query.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;

use crate::value::{NULL, Value};

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
pub type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// Column name to value, in insertion order.
pub type ColumnMap = IndexMap<String, Value>;

/// Column name to the backend's declared type name, in result order.
pub type Schema = IndexMap<String, String>;

/// Name and declared type of a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    declared_type: Option<String>,
}

impl Column {
    /// Creates a column description.
    pub fn new(name: impl Into<String>, declared_type: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.map(Into::into),
        }
    }

    /// The column label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type, or `None` for computed expressions.
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }
}

/// A materialized query result: column metadata plus every returned record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    table_name: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Creates an empty record set with the given metadata.
    #[must_use]
    pub fn new(table_name: Option<String>, columns: Vec<Column>) -> Self {
        Self {
            table_name,
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a record. Values are positional, matching [`columns`](Self::columns).
    ///
    /// # Panics
    ///
    /// Panics if the number of values differs from the number of columns.
    pub fn push(&mut self, values: Vec<Value>) {
        assert_eq!(
            values.len(),
            self.columns.len(),
            "record width must match the column count"
        );
        self.rows.push(values);
    }

    /// Name of the table the first column originates from, if known.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Result columns.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column to declared type snapshot. Columns without a declared type are omitted.
    #[must_use]
    pub fn schema(&self) -> Schema {
        self.columns
            .iter()
            .filter_map(|column| {
                column
                    .declared_type()
                    .map(|declared| (column.name.clone(), String::from(declared)))
            })
            .collect()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the query returned no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the records in result order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            columns: &self.columns,
            values,
        })
    }
}

/// One record of a [`RecordSet`].
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [Column],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the named column, NULL if absent.
    #[must_use]
    pub fn get(&self, column: &str) -> &'a Value {
        self.iter()
            .find_map(|(name, value)| (name == column).then_some(value))
            .unwrap_or(&NULL)
    }

    /// Iterates over `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(Column::name)
            .zip(self.values.iter())
    }
}
