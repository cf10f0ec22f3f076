//! Stateful rows saved to and reloaded from an in-memory SQLite database.
//!
//! These tests check that a row without identity is matched on every original
//! column, that updates and deletes touch a single physical row even when
//! duplicates exist, and that every value kind survives a round trip.
#![cfg(feature = "sqlite")]

use rowkeeper::{
    Connection, Error, Row, SqliteAdapter, StatefulRow, StatefulRowFactory, StatefulTable, Value,
};

// =============================================================================
// Helper functions
// =============================================================================

fn connect(ddl: &str) -> Connection<SqliteAdapter> {
    let mut connection = Connection::sqlite(":memory:");
    connection.open().expect("Failed to open in-memory database");
    connection.execute(ddl, None).expect("Failed to create table");
    connection
}

fn load(connection: &mut Connection<SqliteAdapter>, sql: &str) -> StatefulTable {
    connection
        .fill(StatefulRowFactory, sql, None)
        .expect("Failed to fill table")
}

fn count(connection: &mut Connection<SqliteAdapter>, sql: &str) -> i64 {
    let table = load(connection, sql);
    table[0].get("n").as_i64().expect("count is an integer")
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_insert_then_reload() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT, Qty INTEGER, Data BLOB)");
    let mut table = load(&mut connection, "SELECT * FROM Items");
    assert_eq!(table.name(), "Items");

    let row = table.create_row();
    row.set("Name", "widget");
    row.set("Qty", 3i64);
    row.set("Data", hex::decode("DEADBEEF").unwrap());
    assert_eq!(connection.save(&mut table).unwrap(), 1);

    let reloaded = load(&mut connection, "SELECT * FROM Items");
    assert_eq!(reloaded.len(), 1);
    let row = &reloaded[0];
    assert_eq!(row.get("Name"), &Value::from("widget"));
    assert_eq!(row.get("Qty"), &Value::BigInt(3));
    assert_eq!(
        hex::encode_upper(row.get("Data").as_bytes().unwrap()),
        "DEADBEEF"
    );
    assert!(row.changes().is_empty());
}

#[test]
fn test_update_changes_only_the_matched_row() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT, Qty INTEGER)");
    connection
        .execute(
            "INSERT INTO Items VALUES ('a', 1); INSERT INTO Items VALUES ('b', 2);",
            None,
        )
        .unwrap();

    let mut table = load(&mut connection, "SELECT * FROM Items WHERE Name = 'b'");
    table[0].set("Qty", 20i64);
    assert_eq!(connection.save(&mut table).unwrap(), 1);

    let all = load(&mut connection, "SELECT * FROM Items ORDER BY Name");
    assert_eq!(all[0].get("Qty"), &Value::BigInt(1));
    assert_eq!(all[1].get("Qty"), &Value::BigInt(20));
}

#[test]
fn test_null_originals_are_matched_with_is_null() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT, Note TEXT)");
    connection
        .execute("INSERT INTO Items VALUES ('a', NULL)", None)
        .unwrap();

    let mut table = load(&mut connection, "SELECT * FROM Items");
    table[0].set("Note", "filled");
    assert_eq!(connection.save(&mut table).unwrap(), 1);

    let reloaded = load(&mut connection, "SELECT * FROM Items");
    assert_eq!(reloaded[0].get("Note"), &Value::from("filled"));
}

#[test]
fn test_duplicates_are_updated_one_at_a_time() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT, Qty INTEGER)");
    connection
        .execute(
            "INSERT INTO Items VALUES ('same', 1); INSERT INTO Items VALUES ('same', 1);",
            None,
        )
        .unwrap();

    let mut table = load(&mut connection, "SELECT * FROM Items");
    assert_eq!(table.len(), 2);
    table[0].set("Qty", 5i64);
    assert_eq!(connection.save(&mut table).unwrap(), 1);
    assert_eq!(
        count(&mut connection, "SELECT COUNT(*) AS n FROM Items WHERE Qty = 5"),
        1
    );
    assert_eq!(
        count(&mut connection, "SELECT COUNT(*) AS n FROM Items WHERE Qty = 1"),
        1
    );
}

#[test]
fn test_duplicates_are_deleted_one_at_a_time() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT)");
    connection
        .execute(
            "INSERT INTO Items VALUES ('x'); INSERT INTO Items VALUES ('x'); \
             INSERT INTO Items VALUES ('x');",
            None,
        )
        .unwrap();

    let mut table = load(&mut connection, "SELECT * FROM Items");
    table[0].set_deleted(true);
    table[1].set_deleted(true);
    assert_eq!(connection.save(&mut table).unwrap(), 2);
    assert_eq!(count(&mut connection, "SELECT COUNT(*) AS n FROM Items"), 1);
}

#[test]
fn test_numeric_columns_match_through_cast() {
    let mut connection =
        connect("CREATE TABLE Prices (Item TEXT, Price NUMERIC(10,2), Weight REAL)");
    connection
        .execute("INSERT INTO Prices VALUES ('a', 12.50, 0.1)", None)
        .unwrap();

    let mut table = load(&mut connection, "SELECT * FROM Prices");
    table[0].set("Item", "b");
    assert_eq!(connection.save(&mut table).unwrap(), 1);

    let reloaded = load(&mut connection, "SELECT * FROM Prices");
    assert_eq!(reloaded[0].get("Item"), &Value::from("b"));
}

// =============================================================================
// Decision table
// =============================================================================

#[test]
fn test_loaded_row_without_changes_saves_nothing() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT)");
    connection
        .execute("INSERT INTO Items VALUES ('a')", None)
        .unwrap();
    let mut table = load(&mut connection, "SELECT * FROM Items");
    table[0].set("Name", "a");
    assert_eq!(table.generate_save(connection.adapter()).unwrap(), "");
    assert_eq!(connection.save(&mut table).unwrap(), 0);
}

#[test]
fn test_deleting_a_new_row_saves_nothing() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT)");
    let mut table = StatefulTable::with_name(StatefulRowFactory, "Items");
    table.create_row().set("Name", "never stored");
    table[0].set_deleted(true);
    assert_eq!(connection.save(&mut table).unwrap(), 0);
    assert_eq!(count(&mut connection, "SELECT COUNT(*) AS n FROM Items"), 0);
}

#[test]
fn test_delete_wins_over_changes() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT)");
    connection
        .execute("INSERT INTO Items VALUES ('a')", None)
        .unwrap();
    let mut table = load(&mut connection, "SELECT * FROM Items");
    table[0].set("Name", "b");
    table[0].set_deleted(true);
    assert_eq!(connection.save(&mut table).unwrap(), 1);
    assert_eq!(count(&mut connection, "SELECT COUNT(*) AS n FROM Items"), 0);
}

#[test]
fn test_detached_rows_need_a_named_table() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT)");
    let mut table = StatefulTable::default();
    let mut row = StatefulRow::new();
    row.set("Name", "a");
    table.push(row);
    assert!(matches!(
        connection.save(&mut table),
        Err(Error::InvalidRowState(_))
    ));
}

#[test]
fn test_save_on_closed_connection() {
    let mut connection = connect("CREATE TABLE Items (Name TEXT)");
    let mut table = load(&mut connection, "SELECT * FROM Items");
    table.create_row().set("Name", "a");
    connection.close();
    assert_eq!(connection.save(&mut table), Err(Error::NotConnected));
}
