//! SQLite backend built on rusqlite.

extern crate std;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::ValueRef;
use uuid::Uuid;

use crate::adapter::Adapter;
use crate::codec::{DATE_FORMAT, TIME_FORMAT, TIMESTAMP_FORMAT, ValueCodec, quote_with};
use crate::errors::Error;
use crate::record::{Column, RecordSet};
use crate::settings::{Setting, Settings};
use crate::value::{Decimal, Value};

/// Database name opening a private in-memory database.
const MEMORY: &str = ":memory:";

/// Largest busy timeout SQLite accepts, in milliseconds.
const MAX_BUSY_TIMEOUT: Duration = Duration::from_millis(2_147_483_647);

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Backend(err.to_string())
    }
}

/// Literal rendering of an open SQLite session.
///
/// Stateful updates and deletes are pinned to one row through `rowid`, so
/// tables declared `WITHOUT ROWID` only support versioned rows.
#[derive(Debug)]
pub struct SqliteCodec {
    _session: (),
}

impl ValueCodec for SqliteCodec {
    fn quote_identifier(&self, identifier: &str) -> String {
        quote_with(identifier, '"')
    }

    fn quote_literal(&self, literal: &str) -> String {
        quote_with(literal, '\'')
    }

    fn row_locator(&self) -> &str {
        "rowid"
    }
}

#[derive(Debug)]
struct Session {
    conn: rusqlite::Connection,
    codec: SqliteCodec,
}

/// Adapter over a SQLite database file, or an in-memory database when the
/// database setting is `:memory:`.
///
/// Only [`Setting::Database`] is required; server, user and password are
/// ignored.
#[derive(Debug, Default)]
pub struct SqliteAdapter {
    session: Option<Session>,
}

impl SqliteAdapter {
    /// Creates a closed adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying rusqlite connection, while open.
    #[must_use]
    pub fn connection(&self) -> Option<&rusqlite::Connection> {
        self.session.as_ref().map(|session| &session.conn)
    }

    fn session(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or(Error::NotConnected)
    }
}

impl Adapter for SqliteAdapter {
    const REQUIRED: &'static [Setting] = &[Setting::Database];

    type Codec = SqliteCodec;

    fn open(&mut self, settings: &Settings) -> Result<(), Error> {
        settings.require(Self::REQUIRED)?;
        let Some(database) = settings.database.as_deref() else {
            return Err(Error::Configuration(Setting::Database));
        };
        self.close();

        let conn = if database == MEMORY {
            rusqlite::Connection::open_in_memory()?
        } else {
            rusqlite::Connection::open(database)?
        };
        conn.busy_timeout(settings.timeout.min(MAX_BUSY_TIMEOUT))?;
        log::debug!("opened SQLite database {database}");
        self.session = Some(Session {
            conn,
            codec: SqliteCodec { _session: () },
        });
        Ok(())
    }

    fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match session.conn.close() {
            Ok(()) => log::debug!("closed SQLite database"),
            Err((_, err)) => log::warn!("closing SQLite database failed: {err}"),
        }
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn codec(&self) -> Result<&SqliteCodec, Error> {
        self.session().map(|session| &session.codec)
    }

    fn execute(&mut self, sql: &str) -> Result<u64, Error> {
        let conn = &self.session()?.conn;
        let before = conn.total_changes();
        conn.execute_batch(sql)?;
        Ok(conn.total_changes().saturating_sub(before))
    }

    fn fill(&mut self, sql: &str) -> Result<RecordSet, Error> {
        let conn = &self.session()?.conn;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|column| Column::new(column.name(), column.decl_type()))
            .collect();
        let table_name = stmt
            .columns_with_metadata()
            .first()
            .and_then(|column| column.table_name())
            .map(ToString::to_string);

        let mut records = RecordSet::new(table_name, columns);
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(records.columns().len());
            for (idx, column) in records.columns().iter().enumerate() {
                values.push(hydrate(column.declared_type(), row.get_ref(idx)?)?);
            }
            records.push(values);
        }
        log::trace!("fetched {} records", records.len());
        Ok(records)
    }
}

/// Declared type families whose storage class alone is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declared {
    Boolean,
    Uuid,
    Date,
    Time,
    Timestamp,
    Decimal,
    Other,
}

impl Declared {
    fn of(declared: Option<&str>) -> Self {
        let Some(declared) = declared else {
            return Declared::Other;
        };
        let base = declared.split('(').next().unwrap_or_default().trim();
        let is = |name: &str| base.eq_ignore_ascii_case(name);
        if is("BOOL") || is("BOOLEAN") {
            Declared::Boolean
        } else if is("UUID") || is("GUID") || is("UNIQUEIDENTIFIER") {
            Declared::Uuid
        } else if is("DATE") {
            Declared::Date
        } else if is("TIME") {
            Declared::Time
        } else if is("TIMESTAMP") || is("DATETIME") {
            Declared::Timestamp
        } else if is("NUMERIC") || is("DECIMAL") {
            Declared::Decimal
        } else {
            Declared::Other
        }
    }
}

/// Converts a SQLite cell into a [`Value`].
///
/// The declared column type recovers kinds SQLite stores as text or
/// integers, but only when the typed value renders back to exactly the
/// stored cell. Anything else keeps its storage class, so the literal of a
/// loaded value always matches the cell it came from.
fn hydrate(declared: Option<&str>, raw: ValueRef<'_>) -> Result<Value, Error> {
    let kind = Declared::of(declared);
    let text = match raw {
        ValueRef::Null => return Ok(Value::Null),
        ValueRef::Integer(v @ (0 | 1)) if kind == Declared::Boolean => {
            return Ok(Value::Boolean(v == 1));
        }
        ValueRef::Integer(v) => return Ok(Value::BigInt(v)),
        ValueRef::Real(v) => return Ok(Value::Real(v)),
        ValueRef::Blob(bytes) => return Ok(Value::Blob(bytes.to_vec())),
        ValueRef::Text(bytes) => core::str::from_utf8(bytes).map_err(|_| {
            Error::UnsupportedType(format!(
                "invalid UTF-8 text in a column declared {}",
                declared.unwrap_or("without type")
            ))
        })?,
    };
    Ok(typed_text(kind, text).unwrap_or_else(|| Value::Text(text.to_string())))
}

/// Parses `text` as the declared kind, keeping the result only when its
/// canonical rendering is `text` itself.
fn typed_text(kind: Declared, text: &str) -> Option<Value> {
    let (value, canonical) = match kind {
        Declared::Uuid => {
            let v = Uuid::parse_str(text).ok()?;
            (Value::Uuid(v), v.hyphenated().to_string())
        }
        Declared::Date => {
            let v = NaiveDate::parse_from_str(text, DATE_FORMAT).ok()?;
            (Value::Date(v), v.format(DATE_FORMAT).to_string())
        }
        Declared::Time => {
            let v = NaiveTime::parse_from_str(text, TIME_FORMAT).ok()?;
            (Value::Time(v), v.format(TIME_FORMAT).to_string())
        }
        Declared::Timestamp => {
            let v = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()?;
            (Value::Timestamp(v), v.format(TIMESTAMP_FORMAT).to_string())
        }
        Declared::Decimal => {
            let v = text.parse::<Decimal>().ok()?;
            let canonical = v.to_string();
            (Value::Decimal(v), canonical)
        }
        Declared::Boolean | Declared::Other => return None,
    };
    (canonical == text).then_some(value)
}
