//! Shared input types and checks for the rowkeeper fuzz targets.

use arbitrary::Arbitrary;
use chrono::NaiveDate;
use rowkeeper::{Connection, Row, SqliteAdapter, StatefulRowFactory, StatefulTable, Value};
use uuid::Uuid;

/// Column names of the scratch table used by the stateful target.
pub const COLUMNS: [&str; 4] = ["a", "b", "c", "d"];

/// Arbitrary value restricted to what SQLite can store and hand back.
#[derive(Debug, Clone, Arbitrary)]
pub enum FuzzValue {
    Null,
    Boolean(bool),
    BigInt(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Uuid([u8; 16]),
    Date(u32),
}

impl FuzzValue {
    /// Converts into a [`Value`], or `None` for inputs SQL text cannot carry.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Boolean(v) => Value::Boolean(*v),
            FuzzValue::BigInt(v) => Value::BigInt(*v),
            FuzzValue::Real(v) => Value::Real(*v),
            FuzzValue::Text(v) if v.contains('\0') => return None,
            FuzzValue::Text(v) => Value::Text(v.clone()),
            FuzzValue::Blob(v) => Value::Blob(v.clone()),
            FuzzValue::Uuid(bytes) => Value::Uuid(Uuid::from_bytes(*bytes)),
            FuzzValue::Date(days) => {
                let days = i32::try_from(days % 2_900_000).ok()? + 1;
                Value::Date(NaiveDate::from_num_days_from_ce_opt(days)?)
            }
        })
    }

    /// Converts into the [`Value`] a column without declared type hands back:
    /// booleans become integers, UUIDs and dates become their literal text.
    #[must_use]
    pub fn to_untyped_value(&self) -> Option<Value> {
        Some(match self.to_value()? {
            Value::Boolean(v) => Value::BigInt(i64::from(v)),
            Value::Uuid(v) => Value::Text(v.hyphenated().to_string()),
            Value::Date(v) => Value::Text(v.format("%Y-%m-%d").to_string()),
            other => other,
        })
    }

    /// Declared column type that hydrates back into the same kind.
    #[must_use]
    pub fn declared_type(&self) -> &'static str {
        match self {
            FuzzValue::Null | FuzzValue::Text(_) => "TEXT",
            FuzzValue::Boolean(_) => "BOOLEAN",
            FuzzValue::BigInt(_) => "INTEGER",
            FuzzValue::Real(_) => "REAL",
            FuzzValue::Blob(_) => "BLOB",
            FuzzValue::Uuid(_) => "UUID",
            FuzzValue::Date(_) => "DATE",
        }
    }
}

/// Value equality as SQLite observes it: floats compare numerically, within
/// one unit of rounding of SQLite's text-to-float conversion.
#[must_use]
pub fn same(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Real(a), Value::Real(b)) => {
            a == b || (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs())
        }
        _ => left == right,
    }
}

/// Opens an in-memory database.
///
/// # Panics
///
/// Panics if SQLite cannot open a database.
#[must_use]
pub fn connect() -> Connection<SqliteAdapter> {
    let mut connection = Connection::sqlite(":memory:");
    connection.open().expect("in-memory database");
    connection
}

/// Loads every row of `sql` as stateful rows.
///
/// # Panics
///
/// Panics if the query fails.
pub fn load(connection: &mut Connection<SqliteAdapter>, sql: &str) -> StatefulTable {
    connection
        .fill(StatefulRowFactory, sql, None)
        .expect("fill scratch table")
}

/// Current view of every tracked column of the first row.
#[must_use]
pub fn snapshot(table: &StatefulTable) -> Vec<Value> {
    COLUMNS.iter().map(|column| table[0].get(column).clone()).collect()
}
