//! Tables: ordered row collections built by a [`RowFactory`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::adapter::Adapter;
use crate::errors::Error;
use crate::record::Schema;
use crate::row::{Row, RowFactory, StatefulRowFactory, VersionedRowFactory};

/// Name and schema of a table, as seen by save generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableInfo {
    name: String,
    schema: Schema,
}

impl TableInfo {
    /// Creates a table description.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// The table name; empty when unknown.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column to declared type.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// An ordered collection of rows sharing a name and schema.
///
/// Rows are created through the table's factory, so every row of a table is
/// of the same variant.
#[derive(Debug, Clone)]
pub struct Table<F: RowFactory> {
    factory: F,
    info: TableInfo,
    rows: Vec<F::Row>,
}

/// Table of [`StatefulRow`](crate::StatefulRow)s.
pub type StatefulTable = Table<StatefulRowFactory>;

/// Table of [`VersionedRow`](crate::VersionedRow)s.
pub type VersionedTable = Table<VersionedRowFactory>;

impl<F: RowFactory> Table<F> {
    /// Creates an empty table named after the factory's default, if any.
    pub fn new(factory: F) -> Self {
        let name = factory.table_name().map(ToString::to_string).unwrap_or_default();
        Self {
            factory,
            info: TableInfo::new(name, Schema::default()),
            rows: Vec::new(),
        }
    }

    /// Creates an empty table with an explicit name.
    pub fn with_name(factory: F, name: impl Into<String>) -> Self {
        let mut table = Self::new(factory);
        table.set_name(name);
        table
    }

    /// The table name; empty when unknown.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Renames the table.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.info.name = name.into();
    }

    /// Column to declared type, as captured by the last fill.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        self.info.schema()
    }

    /// Replaces the schema.
    pub fn set_schema(&mut self, schema: Schema) {
        self.info.schema = schema;
    }

    /// Name and schema together.
    #[must_use]
    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    /// The factory creating this table's rows.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Appends a fresh row from the factory and returns it for editing.
    pub fn create_row(&mut self) -> &mut F::Row {
        let row = self.factory.create();
        self.rows.push(row);
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Appends an existing row.
    pub fn push(&mut self, row: F::Row) {
        self.rows.push(row);
    }

    /// Removes and returns the row at `index`, without deleting it from storage.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> F::Row {
        self.rows.remove(index)
    }

    /// Row at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&F::Row> {
        self.rows.get(index)
    }

    /// Mutable row at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut F::Row> {
        self.rows.get_mut(index)
    }

    /// Iterates over rows in order.
    pub fn iter(&self) -> core::slice::Iter<'_, F::Row> {
        self.rows.iter()
    }

    /// Iterates mutably over rows in order.
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, F::Row> {
        self.rows.iter_mut()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Save statements of every row needing one, in row order.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by [`Row::generate_save`].
    pub fn generate_statements<A: Adapter + ?Sized>(
        &mut self,
        adapter: &A,
    ) -> Result<Vec<String>, Error> {
        let mut statements = Vec::new();
        for row in &mut self.rows {
            if let Some(sql) = row.generate_save(adapter, &self.info)? {
                statements.push(sql);
            }
        }
        Ok(statements)
    }

    /// Concatenates the save statements of every row, in row order.
    ///
    /// Rows needing no statement contribute nothing; an empty string means
    /// there is nothing to save.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by [`Row::generate_save`].
    pub fn generate_save<A: Adapter + ?Sized>(&mut self, adapter: &A) -> Result<String, Error> {
        Ok(self.generate_statements(adapter)?.concat())
    }
}

impl<F: RowFactory + Default> Default for Table<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: RowFactory> Index<usize> for Table<F> {
    type Output = F::Row;

    fn index(&self, index: usize) -> &F::Row {
        &self.rows[index]
    }
}

impl<F: RowFactory> IndexMut<usize> for Table<F> {
    fn index_mut(&mut self, index: usize) -> &mut F::Row {
        &mut self.rows[index]
    }
}

impl<'a, F: RowFactory> IntoIterator for &'a Table<F> {
    type Item = &'a F::Row;
    type IntoIter = core::slice::Iter<'a, F::Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<'a, F: RowFactory> IntoIterator for &'a mut Table<F> {
    type Item = &'a mut F::Row;
    type IntoIter = core::slice::IterMut<'a, F::Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter_mut()
    }
}

impl<F: RowFactory> IntoIterator for Table<F> {
    type Item = F::Row;
    type IntoIter = alloc::vec::IntoIter<F::Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
