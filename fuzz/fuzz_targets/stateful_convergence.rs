//! Stateful row convergence fuzzer.
//!
//! Loads a row, applies an arbitrary sequence of edits, saves, reloads and
//! checks that storage holds exactly what the row showed in memory, and that
//! pending changes never repeat an original value.

use honggfuzz::fuzz;
use rowkeeper::{Row, Value};
use rowkeeper_fuzz::{COLUMNS, FuzzValue, connect, load, same, snapshot};

fn check(initial: &[FuzzValue; 3], edits: &[(u8, FuzzValue)]) {
    let mut connection = connect();
    connection
        .execute("CREATE TABLE T (a, b, c, d)", None)
        .expect("create scratch table");

    let mut table = load(&mut connection, "SELECT * FROM T");
    table.set_name("T");
    let row = table.create_row();
    row.set("a", 0i64);
    for (column, value) in COLUMNS[1..].iter().zip(initial) {
        let Some(value) = value.to_untyped_value() else {
            return;
        };
        row.set(column, value);
    }
    if connection.save(&mut table).is_err() {
        // Non-finite floats have no literal.
        return;
    }

    let mut table = load(&mut connection, "SELECT * FROM T");
    for (idx, value) in edits {
        let Some(value) = value.to_untyped_value() else {
            continue;
        };
        if matches!(value, Value::Real(v) if !v.is_finite()) {
            continue;
        }
        table[0].set(COLUMNS[usize::from(*idx) % COLUMNS.len()], value);
    }
    for (column, value) in table[0].changes() {
        assert_ne!(table[0].originals().get(column), Some(value));
    }

    let expected = snapshot(&table);
    let modified = table[0].is_modified();
    let affected = connection.save(&mut table).expect("save edited row");
    assert_eq!(affected, u64::from(modified));

    let reloaded = load(&mut connection, "SELECT * FROM T");
    assert_eq!(reloaded.len(), 1);
    let actual = snapshot(&reloaded);
    for (column, (stored, wanted)) in COLUMNS.iter().zip(actual.iter().zip(&expected)) {
        assert!(
            same(stored, wanted),
            "column {column}: stored {stored:?}, expected {wanted:?}"
        );
    }
}

fn main() {
    loop {
        fuzz!(|input: ([FuzzValue; 3], Vec<(u8, FuzzValue)>)| {
            let (initial, edits) = input;
            check(&initial, &edits);
        });
    }
}
