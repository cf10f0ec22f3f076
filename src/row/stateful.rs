//! Rows without identity, tracked as originals plus pending changes.

use alloc::string::{String, ToString};

use crate::adapter::Adapter;
use crate::errors::Error;
use crate::record::{ColumnMap, Record};
use crate::row::{Row, RowState};
use crate::table::TableInfo;
use crate::value::{NULL, Value};

/// A row with no identity, no key and no version.
///
/// The values it was loaded with are kept apart from the values set since.
/// On save, it is matched against the stored row by comparing every original
/// column.
///
/// A column present in [`changes`](Self::changes) always differs from its
/// original, or has no original at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatefulRow {
    state: RowState,
    originals: ColumnMap,
    changes: ColumnMap,
}

impl StatefulRow {
    /// Creates a new row with no originals and no changes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row from originals and pending changes.
    ///
    /// Changes are applied one by one through [`Row::set`], so entries equal
    /// to their original are dropped.
    #[must_use]
    pub fn from_parts(originals: ColumnMap, changes: ColumnMap) -> Self {
        let mut row = Self {
            state: RowState::default(),
            originals,
            changes: ColumnMap::default(),
        };
        for (column, value) in changes {
            row.set(&column, value);
        }
        row
    }

    /// Values as loaded from storage; empty for a row never loaded.
    #[must_use]
    pub fn originals(&self) -> &ColumnMap {
        &self.originals
    }

    /// Pending writes.
    #[must_use]
    pub fn changes(&self) -> &ColumnMap {
        &self.changes
    }

    /// Whether the row was never loaded from storage.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.originals.is_empty()
    }

    /// Whether the row has pending writes.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        !self.changes.is_empty()
    }
}

impl Row for StatefulRow {
    fn state(&self) -> &RowState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RowState {
        &mut self.state
    }

    fn get(&self, column: &str) -> &Value {
        self.changes
            .get(column)
            .or_else(|| self.originals.get(column))
            .unwrap_or(&NULL)
    }

    fn set<V: Into<Value>>(&mut self, column: &str, value: V) {
        let value = value.into();
        let reverted = match self.originals.get(column) {
            Some(original) => *original == value,
            None => value.is_null(),
        };
        if reverted {
            self.changes.shift_remove(column);
        } else {
            self.changes.insert(column.to_string(), value);
        }
    }

    fn copy_from(&mut self, record: &Record<'_>) {
        for (column, value) in record.iter() {
            self.originals.insert(column.to_string(), value.clone());
        }
    }

    fn generate_save<A: Adapter + ?Sized>(
        &mut self,
        adapter: &A,
        table: &TableInfo,
    ) -> Result<Option<String>, Error> {
        adapter.generate_stateful_save(table, &self.originals, &self.changes, self.is_deleted())
    }
}
