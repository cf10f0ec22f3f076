//! Sessions, parameters, value hydration and transactions through the SQLite
//! adapter.
#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use rowkeeper::{
    Connection, Decimal, Error, Parameters, Row, Setting, Settings, SqliteAdapter,
    StatefulRowFactory, Value,
};
use uuid::Uuid;

fn connect() -> Connection<SqliteAdapter> {
    let mut connection = Connection::sqlite(":memory:");
    connection.open().expect("Failed to open in-memory database");
    connection
}

// =============================================================================
// Settings and session lifecycle
// =============================================================================

#[test]
fn test_missing_database_setting() {
    let mut connection = Connection::new(SqliteAdapter::new(), Settings::new().with_server("db"));
    assert_eq!(connection.open(), Err(Error::Configuration(Setting::Database)));
    assert_eq!(
        Error::Configuration(Setting::Database).to_string(),
        "Database required for connection"
    );
}

#[test]
fn test_reopen_replaces_session() {
    let mut connection = connect();
    connection.execute("CREATE TABLE t (a INTEGER)", None).unwrap();
    connection.open().unwrap();
    // A fresh in-memory database has no table `t`.
    assert!(matches!(
        connection.execute("INSERT INTO t VALUES (1)", None),
        Err(Error::Backend(_))
    ));
}

#[test]
fn test_file_database_persists_across_sessions() {
    let dir = std::env::temp_dir().join(format!("rowkeeper-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("people.db");
    let path = path.to_str().unwrap();

    let mut connection = Connection::sqlite(path);
    connection.open().unwrap();
    connection
        .execute("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (7);", None)
        .unwrap();
    connection.close();

    connection.open().unwrap();
    let table = connection
        .fill(StatefulRowFactory, "SELECT a FROM t", None)
        .unwrap();
    assert_eq!(table[0].get("a"), &Value::BigInt(7));
    drop(connection);
    std::fs::remove_dir_all(&dir).unwrap();
}

// =============================================================================
// Parameters
// =============================================================================

#[test]
fn test_parameters_of_every_kind() {
    let mut connection = connect();
    connection
        .execute(
            "CREATE TABLE Kinds (Flag BOOLEAN, Small INTEGER, Big INTEGER, Ratio REAL, \
             Amount NUMERIC, Label TEXT, Raw BLOB, Day DATE, Id UUID)",
            None,
        )
        .unwrap();

    let id = Uuid::new_v4();
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let parameters = Parameters::new()
        .with("@Flag", true)
        .with("@Small", 7i32)
        .with("@Big", i64::MAX)
        .with("@Ratio", 0.25f64)
        .with("@Amount", "19.99".parse::<Decimal>().unwrap())
        .with("@Label", "it's")
        .with("@Raw", vec![0u8, 255])
        .with("@Day", day)
        .with("@Id", id);
    let affected = connection
        .execute(
            "INSERT INTO Kinds VALUES \
             (@Flag, @Small, @Big, @Ratio, @Amount, @Label, @Raw, @Day, @Id)",
            Some(&parameters),
        )
        .unwrap();
    assert_eq!(affected, 1);

    let table = connection
        .fill(StatefulRowFactory, "SELECT * FROM Kinds", None)
        .unwrap();
    let row = &table[0];
    assert_eq!(row.get("Flag"), &Value::Boolean(true));
    assert_eq!(row.get("Small"), &Value::Integer(7));
    assert_eq!(row.get("Big"), &Value::BigInt(i64::MAX));
    assert_eq!(row.get("Ratio"), &Value::Real(0.25));
    assert_eq!(row.get("Amount"), &Value::Real(19.99));
    assert_eq!(row.get("Label").as_str(), Some("it's"));
    assert_eq!(row.get("Raw").as_bytes(), Some(&[0u8, 255][..]));
    assert_eq!(row.get("Day"), &Value::Date(day));
    assert_eq!(row.get("Id"), &Value::Uuid(id));
}

#[test]
fn test_prefix_parameter_names() {
    let mut connection = connect();
    let parameters = Parameters::new().with("@Id", 1i64).with("@IdList", 2i64);
    let table = connection
        .fill(
            StatefulRowFactory,
            "SELECT @Id AS a, @IdList AS b",
            Some(&parameters),
        )
        .unwrap();
    assert_eq!(table[0].get("a"), &Value::BigInt(1));
    assert_eq!(table[0].get("b"), &Value::BigInt(2));
}

#[test]
fn test_unsupported_parameter() {
    let mut connection = connect();
    let parameters = Parameters::new().with("@x", f64::NAN);
    assert!(matches!(
        connection.execute("SELECT @x", Some(&parameters)),
        Err(Error::UnsupportedType(_))
    ));
}

// =============================================================================
// Fill
// =============================================================================

#[test]
fn test_fill_uses_first_column_table() {
    let mut connection = connect();
    connection
        .execute(
            "CREATE TABLE A (x INTEGER); CREATE TABLE B (y TEXT); \
             INSERT INTO A VALUES (1); INSERT INTO B VALUES ('b');",
            None,
        )
        .unwrap();
    let table = connection
        .fill(StatefulRowFactory, "SELECT B.y, A.x FROM A, B", None)
        .unwrap();
    assert_eq!(table.name(), "B");
    let columns: Vec<&str> = table.schema().keys().map(String::as_str).collect();
    assert_eq!(columns, ["y", "x"]);
}

#[test]
fn test_fill_keeps_storage_of_mismatched_cells() {
    let mut connection = connect();
    connection
        .execute("CREATE TABLE T (d DATE); INSERT INTO T VALUES (42);", None)
        .unwrap();
    let table = connection
        .fill(StatefulRowFactory, "SELECT d FROM T", None)
        .unwrap();
    assert_eq!(table[0].get("d"), &Value::BigInt(42));
}

// =============================================================================
// Transactions
// =============================================================================

#[test]
fn test_rollback_discards_save() {
    let mut connection = connect();
    connection.execute("CREATE TABLE T (a INTEGER)", None).unwrap();

    connection.begin().unwrap();
    let mut table = connection
        .fill(StatefulRowFactory, "SELECT * FROM T", None)
        .unwrap();
    table.create_row().set("a", 1i64);
    assert_eq!(connection.save(&mut table).unwrap(), 1);
    connection.rollback().unwrap();

    let reloaded = connection
        .fill(StatefulRowFactory, "SELECT * FROM T", None)
        .unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn test_commit_keeps_save() {
    let mut connection = connect();
    connection.execute("CREATE TABLE T (a INTEGER)", None).unwrap();

    connection.begin().unwrap();
    let mut table = connection
        .fill(StatefulRowFactory, "SELECT * FROM T", None)
        .unwrap();
    table.create_row().set("a", 1i64);
    connection.save(&mut table).unwrap();
    connection.commit().unwrap();

    let reloaded = connection
        .fill(StatefulRowFactory, "SELECT * FROM T", None)
        .unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn test_commit_without_transaction_is_a_backend_error() {
    let mut connection = connect();
    assert!(matches!(connection.commit(), Err(Error::Backend(_))));
}
