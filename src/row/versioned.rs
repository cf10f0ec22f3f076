//! Rows keyed by a GUID and guarded by a version counter.

use alloc::string::{String, ToString};

use uuid::Uuid;

use crate::adapter::Adapter;
use crate::errors::Error;
use crate::record::{ColumnMap, Record};
use crate::row::{Row, RowState};
use crate::table::TableInfo;
use crate::value::{NULL, Value};

/// A row identified by a `GUID` column and carrying a `Version` column.
///
/// The version must not be edited by hand. When saved, the stored row with
/// the same GUID and version is updated and its version incremented. If the
/// stored version moved on since this row was loaded, nothing is written and
/// the save reports zero affected rows: someone else changed the row first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionedRow {
    state: RowState,
    values: ColumnMap,
}

impl VersionedRow {
    /// Primary key column name.
    pub const COLUMN_GUID: &'static str = "GUID";
    /// Concurrency version column name.
    pub const COLUMN_VERSION: &'static str = "Version";

    /// Creates an empty, never saved row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row holding the given values.
    #[must_use]
    pub fn from_values(values: ColumnMap) -> Self {
        Self {
            state: RowState::default(),
            values,
        }
    }

    /// All column values, reserved columns included.
    #[must_use]
    pub fn values(&self) -> &ColumnMap {
        &self.values
    }

    /// The concurrency version; 0 for a row that was never saved.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.values
            .get(Self::COLUMN_VERSION)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// The row's GUID, if one was loaded or assigned.
    #[must_use]
    pub fn guid(&self) -> Option<Uuid> {
        self.values.get(Self::COLUMN_GUID).and_then(Value::as_uuid)
    }

    /// Assigns the GUID ahead of the first save.
    pub fn set_guid(&mut self, guid: Uuid) {
        self.set(Self::COLUMN_GUID, guid);
    }
}

impl Row for VersionedRow {
    fn state(&self) -> &RowState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RowState {
        &mut self.state
    }

    fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    fn set<V: Into<Value>>(&mut self, column: &str, value: V) {
        self.values.insert(column.to_string(), value.into());
    }

    fn copy_from(&mut self, record: &Record<'_>) {
        for (column, value) in record.iter() {
            self.values.insert(column.to_string(), value.clone());
        }
    }

    fn generate_save<A: Adapter + ?Sized>(
        &mut self,
        adapter: &A,
        table: &TableInfo,
    ) -> Result<Option<String>, Error> {
        let deleted = self.is_deleted();
        adapter.generate_versioned_save(table, &mut self.values, deleted)
    }
}
