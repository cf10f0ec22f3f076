//! The backend seam: sessions, execution, result hydration and save SQL.
//!
//! An [`Adapter`] owns a backend session. Everything text-related goes
//! through its [`ValueCodec`], which only exists while the session is open.
//! Save statements are built by the provided methods from the codec's
//! dialect hooks, so a backend only overrides them when its SQL shape differs.

use alloc::string::String;

use crate::codec::ValueCodec;
use crate::errors::Error;
use crate::record::{ColumnMap, RecordSet};
use crate::settings::{Setting, Settings};
use crate::table::TableInfo;
use crate::value::Value;

mod save;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use save::{SaveAction, classify};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteAdapter, SqliteCodec};

/// A database backend.
pub trait Adapter {
    /// Settings that must be present and non-empty before [`open`](Self::open).
    const REQUIRED: &'static [Setting];

    /// Literal and identifier rendering of an open session.
    type Codec: ValueCodec;

    /// Opens a session, replacing any open one.
    ///
    /// # Errors
    ///
    /// * `Configuration` - If a required setting is missing.
    /// * `Backend` - If the backend refuses the session.
    fn open(&mut self, settings: &Settings) -> Result<(), Error>;

    /// Closes the session. Closing a closed adapter does nothing.
    fn close(&mut self);

    /// Whether a session is open.
    fn is_open(&self) -> bool;

    /// The codec of the open session.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    fn codec(&self) -> Result<&Self::Codec, Error>;

    /// Executes a batch of statements and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    /// * `Backend` - If the backend rejects a statement.
    fn execute(&mut self, sql: &str) -> Result<u64, Error>;

    /// Runs a query and materializes its records and column metadata.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    /// * `Backend` - If the backend rejects the query.
    /// * `UnsupportedType` - If a cell cannot be hydrated into a [`Value`].
    fn fill(&mut self, sql: &str) -> Result<RecordSet, Error>;

    /// Quotes an identifier with the session's codec.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    fn quote_identifier(&self, identifier: &str) -> Result<String, Error> {
        Ok(self.codec()?.quote_identifier(identifier))
    }

    /// Quotes a string literal with the session's codec.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    fn quote_literal(&self, literal: &str) -> Result<String, Error> {
        Ok(self.codec()?.quote_literal(literal))
    }

    /// Renders a value as a literal with the session's codec.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    /// * `UnsupportedType` - If the value has no literal form.
    fn value_to_literal(&self, value: &Value) -> Result<String, Error> {
        self.codec()?.value_to_literal(value)
    }

    /// Save statement of an identity-less row.
    ///
    /// Updates and deletes match the stored row on every original column and
    /// are limited to one physical row.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    /// * `InvalidRowState` - If the row's state contradicts the statement.
    /// * `UnsupportedType` - If a value has no literal form.
    fn generate_stateful_save(
        &self,
        table: &TableInfo,
        originals: &ColumnMap,
        changes: &ColumnMap,
        deleted: bool,
    ) -> Result<Option<String>, Error> {
        save::stateful(self.codec()?, table, originals, changes, deleted)
    }

    /// Save statement of a GUID-keyed, versioned row.
    ///
    /// A missing GUID is generated and a missing version defaults to 0; both
    /// are written back into `values`.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If no session is open.
    /// * `InvalidRowState` - If a never saved row is deleted, or the version
    ///   is not an integer.
    /// * `UnsupportedType` - If a value has no literal form.
    fn generate_versioned_save(
        &self,
        table: &TableInfo,
        values: &mut ColumnMap,
        deleted: bool,
    ) -> Result<Option<String>, Error> {
        save::versioned(self.codec()?, table, values, deleted)
    }

    /// Starts a transaction.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    fn begin(&mut self) -> Result<(), Error> {
        self.execute("BEGIN").map(drop)
    }

    /// Commits the current transaction.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    fn commit(&mut self) -> Result<(), Error> {
        self.execute("COMMIT").map(drop)
    }

    /// Rolls back the current transaction.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    fn rollback(&mut self) -> Result<(), Error> {
        self.execute("ROLLBACK").map(drop)
    }
}
