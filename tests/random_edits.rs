//! Randomized edit sequences: whatever a row shows in memory is what a save
//! followed by a reload returns.
#![cfg(feature = "sqlite")]

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rowkeeper::{
    Connection, Row, SqliteAdapter, StatefulRowFactory, StatefulTable, Value, VersionedRowFactory,
    VersionedTable,
};

const COLUMNS: [&str; 4] = ["a", "b", "c", "d"];

fn random_value(rng: &mut StdRng) -> Value {
    match rng.random_range(0..5) {
        0 => Value::Null,
        1 => Value::BigInt(rng.random_range(-3..3)),
        2 => Value::Real(f64::from(rng.random_range(-8i32..8)) / 4.0),
        3 => Value::Text(["x", "y", "O'Neil", ""][rng.random_range(0..4)].to_string()),
        _ => Value::Blob(vec![rng.random_range(0..=255u8); rng.random_range(0..3)]),
    }
}

fn connect() -> Connection<SqliteAdapter> {
    let mut connection = Connection::sqlite(":memory:");
    connection.open().expect("Failed to open in-memory database");
    connection
        .execute("CREATE TABLE T (a, b, c, d)", None)
        .expect("Failed to create table");
    connection
}

fn load(connection: &mut Connection<SqliteAdapter>) -> StatefulTable {
    connection
        .fill(StatefulRowFactory, "SELECT * FROM T", None)
        .expect("Failed to fill table")
}

#[test]
fn test_stateful_edits_converge() {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for _ in 0..200 {
        let mut connection = connect();
        let mut table = load(&mut connection);
        table.set_name("T");
        let row = table.create_row();
        row.set("a", rng.random_range(10i64..20));
        for column in &COLUMNS[1..] {
            row.set(column, random_value(&mut rng));
        }
        connection.save(&mut table).unwrap();

        let mut table = load(&mut connection);
        let mut expected: Vec<Value> = COLUMNS.iter().map(|c| table[0].get(c).clone()).collect();
        for _ in 0..rng.random_range(0..8) {
            let idx = rng.random_range(0..COLUMNS.len());
            let value = random_value(&mut rng);
            table[0].set(COLUMNS[idx], value.clone());
            expected[idx] = value;
        }
        for (idx, column) in COLUMNS.iter().enumerate() {
            assert_eq!(table[0].get(column), &expected[idx]);
        }
        for (column, value) in table[0].changes() {
            assert_ne!(table[0].originals().get(column), Some(value));
        }

        let modified = table[0].is_modified();
        let affected = connection.save(&mut table).unwrap();
        assert_eq!(affected, u64::from(modified));

        let reloaded = load(&mut connection);
        assert_eq!(reloaded.len(), 1);
        for (idx, column) in COLUMNS.iter().enumerate() {
            assert_eq!(reloaded[0].get(column), &expected[idx], "column {column}");
        }
    }
}

#[test]
fn test_fresh_versioned_rows_never_share_guids() {
    let mut connection = Connection::sqlite(":memory:");
    connection.open().unwrap();
    connection
        .execute("CREATE TABLE V (GUID TEXT PRIMARY KEY, Version INTEGER, n INTEGER)", None)
        .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let mut table = VersionedTable::with_name(VersionedRowFactory, "V");
    let rows: u32 = rng.random_range(50..100);
    for n in 0..rows {
        table.create_row().set("n", i64::from(n));
    }
    assert_eq!(connection.save(&mut table).unwrap(), u64::from(rows));

    let stored = connection
        .fill(VersionedRowFactory, "SELECT * FROM V", None)
        .unwrap();
    let mut guids: Vec<_> = stored.iter().map(|row| row.guid().unwrap()).collect();
    guids.sort();
    guids.dedup();
    assert_eq!(guids.len(), stored.len());
    assert!(stored.iter().all(|row| row.version() == 1));
}
