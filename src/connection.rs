//! The user-facing session: settings plus an adapter.

use alloc::borrow::Cow;

use crate::adapter::Adapter;
use crate::errors::Error;
use crate::parameters::Parameters;
use crate::row::{Row, RowFactory};
use crate::settings::Settings;
use crate::table::Table;

#[cfg(feature = "sqlite")]
use crate::adapter::SqliteAdapter;

/// A database session owning its adapter and settings.
///
/// The session is closed when the connection is dropped.
#[derive(Debug)]
pub struct Connection<A: Adapter> {
    adapter: A,
    settings: Settings,
}

impl<A: Adapter> Connection<A> {
    /// Creates a closed connection.
    pub fn new(adapter: A, settings: Settings) -> Self {
        Self { adapter, settings }
    }

    /// Connection settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable connection settings; changes apply on the next [`open`](Self::open).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The adapter.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The adapter, mutably.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Opens the session after checking the adapter's required settings.
    ///
    /// # Errors
    ///
    /// * `Configuration` - naming the first missing required setting.
    /// * `Backend` - If the backend refuses the session.
    pub fn open(&mut self) -> Result<(), Error> {
        self.settings.require(A::REQUIRED)?;
        self.adapter.open(&self.settings)
    }

    /// Closes the session, if open.
    pub fn close(&mut self) {
        self.adapter.close();
    }

    /// Whether the session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.adapter.is_open()
    }

    fn prepare<'a>(
        &self,
        sql: &'a str,
        parameters: Option<&Parameters>,
    ) -> Result<Cow<'a, str>, Error> {
        match parameters {
            Some(parameters) if !parameters.is_empty() => {
                log::trace!("substituting parameters {parameters}");
                Ok(Cow::Owned(parameters.substitute(sql, self.adapter.codec()?)?))
            }
            _ => Ok(Cow::Borrowed(sql)),
        }
    }

    /// Executes a statement batch after parameter substitution and returns
    /// the number of affected rows.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If the session is closed.
    /// * `UnsupportedType` - If a parameter value has no literal form.
    /// * `Backend` - If the backend rejects a statement.
    pub fn execute(&mut self, sql: &str, parameters: Option<&Parameters>) -> Result<u64, Error> {
        let sql = self.prepare(sql, parameters)?;
        log::debug!("executing {} bytes of SQL", sql.len());
        log::trace!("{sql}");
        self.adapter.execute(&sql)
    }

    /// Runs a query and loads every record into a new table built by `factory`.
    ///
    /// The table is named after the table of the first result column and its
    /// schema holds the declared type of every column that has one. Each row
    /// is created through the factory and loaded with
    /// [`Row::copy_from`].
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If the session is closed.
    /// * `UnsupportedType` - If a parameter or a result cell has no mapping.
    /// * `Backend` - If the backend rejects the query.
    pub fn fill<F: RowFactory>(
        &mut self,
        factory: F,
        sql: &str,
        parameters: Option<&Parameters>,
    ) -> Result<Table<F>, Error> {
        let sql = self.prepare(sql, parameters)?;
        log::debug!("filling a table from {} bytes of SQL", sql.len());
        log::trace!("{sql}");
        let records = self.adapter.fill(&sql)?;

        let mut table = Table::new(factory);
        if let Some(name) = records.table_name() {
            table.set_name(name);
        }
        table.set_schema(records.schema());
        for record in records.records() {
            table.create_row().copy_from(&record);
        }
        Ok(table)
    }

    /// Generates the save batch of `table` and executes it.
    ///
    /// Returns the number of affected rows; zero means nothing needed saving,
    /// or a versioned row lost a concurrency race. Row state is left as is:
    /// reload the table to observe the stored result.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If the session is closed.
    /// * `InvalidRowState` - If a row's state contradicts its statement.
    /// * `UnsupportedType` - If a value has no literal form.
    /// * `Backend` - If the backend rejects the batch.
    pub fn save<F: RowFactory>(&mut self, table: &mut Table<F>) -> Result<u64, Error> {
        let statements = table.generate_statements(&self.adapter)?;
        if statements.is_empty() {
            log::debug!("nothing to save in {}", table.name());
            return Ok(0);
        }
        let batch = statements.concat();
        log::debug!("saving {} statements to {}", statements.len(), table.name());
        log::trace!("{batch}");
        let affected = self.adapter.execute(&batch)?;
        if affected < statements.len() as u64 {
            log::warn!(
                "{} statements on {} affected only {affected} rows",
                statements.len(),
                table.name()
            );
        }
        Ok(affected)
    }

    /// Starts a transaction.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If the session is closed.
    /// * `Backend` - If the backend refuses.
    pub fn begin(&mut self) -> Result<(), Error> {
        self.adapter.begin()
    }

    /// Commits the current transaction.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If the session is closed.
    /// * `Backend` - If the backend refuses.
    pub fn commit(&mut self) -> Result<(), Error> {
        self.adapter.commit()
    }

    /// Rolls back the current transaction.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - If the session is closed.
    /// * `Backend` - If the backend refuses.
    pub fn rollback(&mut self) -> Result<(), Error> {
        self.adapter.rollback()
    }
}

#[cfg(feature = "sqlite")]
impl Connection<SqliteAdapter> {
    /// Creates a closed SQLite connection to `database`, a file path or
    /// `:memory:`.
    pub fn sqlite(database: impl Into<alloc::string::String>) -> Self {
        Self::new(SqliteAdapter::new(), Settings::new().with_database(database))
    }
}

impl<A: Adapter> Drop for Connection<A> {
    fn drop(&mut self) {
        if self.adapter.is_open() {
            self.adapter.close();
        }
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use alloc::string::String;

    use crate::row::{StatefulRowFactory, VersionedRowFactory};
    use crate::settings::Setting;
    use crate::value::Value;

    fn open() -> Connection<SqliteAdapter> {
        let mut connection = Connection::sqlite(":memory:");
        connection.open().unwrap();
        connection
    }

    #[test]
    fn test_open_validates_settings() {
        let mut connection = Connection::new(SqliteAdapter::new(), Settings::new());
        assert_eq!(
            connection.open(),
            Err(Error::Configuration(Setting::Database))
        );
        assert!(!connection.is_open());
    }

    #[test]
    fn test_execute_on_closed_connection() {
        let mut connection = Connection::sqlite(":memory:");
        assert_eq!(connection.execute("SELECT 1", None), Err(Error::NotConnected));
        let parameters = Parameters::new().with("@x", 1i64);
        assert_eq!(
            connection.execute("SELECT @x", Some(&parameters)),
            Err(Error::NotConnected)
        );
    }

    #[test]
    fn test_fill_names_table_and_schema() {
        let mut connection = open();
        connection
            .execute("CREATE TABLE Things (Name TEXT, Weight REAL)", None)
            .unwrap();
        connection
            .execute("INSERT INTO Things VALUES ('anvil', 80.5)", None)
            .unwrap();
        let table = connection
            .fill(StatefulRowFactory, "SELECT * FROM Things", None)
            .unwrap();
        assert_eq!(table.name(), "Things");
        assert_eq!(table.schema().get("Weight").map(String::as_str), Some("REAL"));
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].get("Weight"), &Value::Real(80.5));
        assert!(!table[0].is_new());
    }

    #[test]
    fn test_save_of_clean_table_is_a_no_op() {
        let mut connection = open();
        connection
            .execute("CREATE TABLE Things (GUID TEXT, Version INTEGER, Name TEXT)", None)
            .unwrap();
        let mut table = connection
            .fill(VersionedRowFactory, "SELECT * FROM Things", None)
            .unwrap();
        assert_eq!(connection.save(&mut table).unwrap(), 0);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut connection = open();
        connection.close();
        connection.close();
        assert!(!connection.is_open());
    }
}
