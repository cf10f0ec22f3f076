//! Literal round-trip fuzzer.
//!
//! Renders an arbitrary value as a parameter literal, stores it in a column
//! declared for its kind and checks that hydration hands back the same value.
//! Non-finite floats must be rejected instead of rendered.

use honggfuzz::fuzz;
use rowkeeper::{Error, Parameters, Row, Value};
use rowkeeper_fuzz::{FuzzValue, connect, load, same};

fn check(input: &FuzzValue) {
    let Some(value) = input.to_value() else {
        return;
    };
    let mut connection = connect();
    connection
        .execute(
            &format!("CREATE TABLE T (v {})", input.declared_type()),
            None,
        )
        .expect("create scratch table");

    let parameters = Parameters::new().with("@v", value.clone());
    match connection.execute("INSERT INTO T VALUES (@v)", Some(&parameters)) {
        Ok(affected) => assert_eq!(affected, 1),
        Err(Error::UnsupportedType(_)) => {
            assert!(matches!(value, Value::Real(v) if !v.is_finite()));
            return;
        }
        Err(err) => panic!("insert of {value:?} failed: {err}"),
    }

    let table = load(&mut connection, "SELECT v FROM T");
    let stored = table[0].get("v");
    assert!(same(stored, &value), "{value:?} came back as {stored:?}");
}

fn main() {
    loop {
        fuzz!(|input: FuzzValue| {
            check(&input);
        });
    }
}
