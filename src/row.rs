//! Rows: a record's mutable state plus the contract for turning it into SQL.
//!
//! Two variants with different identity rules share the [`Row`] trait:
//!
//! - [`StatefulRow`] has no identity. It keeps the values it was loaded with
//!   apart from pending changes, and is matched on every original column.
//! - [`VersionedRow`] is keyed by a `GUID` column and carries a `Version`
//!   counter used for optimistic concurrency.

use alloc::string::String;

use crate::adapter::Adapter;
use crate::errors::Error;
use crate::record::Record;
use crate::table::TableInfo;
use crate::value::Value;

mod stateful;
mod versioned;

pub use stateful::StatefulRow;
pub use versioned::VersionedRow;

/// State shared by every row variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowState {
    /// Whether the row is marked for deletion on the next save.
    pub deleted: bool,
}

/// A single record's mutable state.
pub trait Row {
    /// Shared row state.
    fn state(&self) -> &RowState;

    /// Mutable shared row state.
    fn state_mut(&mut self) -> &mut RowState;

    /// Current value of a column, NULL when the column is unknown.
    fn get(&self, column: &str) -> &Value;

    /// Sets the value of a column.
    fn set<V: Into<Value>>(&mut self, column: &str, value: V);

    /// Loads the row from a fetched record.
    fn copy_from(&mut self, record: &Record<'_>);

    /// Generates the statement that persists this row, or `None` when the
    /// row needs no statement.
    ///
    /// `table` describes the table owning the row; a row detached from its
    /// table must be given that description explicitly.
    ///
    /// # Errors
    ///
    /// * `InvalidRowState` - If the row's state violates the precondition of
    ///   the statement it calls for.
    /// * `NotConnected` - If the adapter has no open session.
    /// * `UnsupportedType` - If a value has no literal form.
    fn generate_save<A: Adapter + ?Sized>(
        &mut self,
        adapter: &A,
        table: &TableInfo,
    ) -> Result<Option<String>, Error>;

    /// Whether the row is marked for deletion.
    fn is_deleted(&self) -> bool {
        self.state().deleted
    }

    /// Marks or unmarks the row for deletion.
    fn set_deleted(&mut self, deleted: bool) {
        self.state_mut().deleted = deleted;
    }
}

/// Creates rows for a [`Table`](crate::Table).
///
/// Factories are plain values handed to the table when it is built.
pub trait RowFactory {
    /// The row variant produced.
    type Row: Row;

    /// Creates an empty row.
    fn create(&self) -> Self::Row;

    /// Table name used when none is set explicitly or found in query metadata.
    fn table_name(&self) -> Option<&str> {
        None
    }
}

/// Factory of [`StatefulRow`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatefulRowFactory;

impl RowFactory for StatefulRowFactory {
    type Row = StatefulRow;

    fn create(&self) -> StatefulRow {
        StatefulRow::new()
    }
}

/// Factory of [`VersionedRow`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionedRowFactory;

impl RowFactory for VersionedRowFactory {
    type Row = VersionedRow;

    fn create(&self) -> VersionedRow {
        VersionedRow::new()
    }
}
