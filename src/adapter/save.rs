//! Save statement generation shared by every adapter.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use uuid::Uuid;

use crate::codec::ValueCodec;
use crate::errors::Error;
use crate::record::ColumnMap;
use crate::row::VersionedRow;
use crate::table::TableInfo;
use crate::value::{NULL, Value};

const GUID: &str = VersionedRow::COLUMN_GUID;
const VERSION: &str = VersionedRow::COLUMN_VERSION;

/// Statement a row calls for on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveAction {
    /// The row was never stored and has values to write.
    Insert,
    /// The row was loaded and has pending writes.
    Update,
    /// The row was loaded and is marked for deletion.
    Delete,
}

/// Maps a row's flags to the statement it calls for, or `None` for no statement.
///
/// Deletion wins over modification; a never stored row marked for deletion
/// needs nothing.
#[must_use]
pub fn classify(is_new: bool, is_modified: bool, is_deleted: bool) -> Option<SaveAction> {
    match (is_new, is_modified, is_deleted) {
        (false, _, true) => Some(SaveAction::Delete),
        (false, true, false) => Some(SaveAction::Update),
        (true, true, false) => Some(SaveAction::Insert),
        _ => None,
    }
}

fn quoted_table<C: ValueCodec + ?Sized>(codec: &C, table: &TableInfo) -> Result<String, Error> {
    if table.name().is_empty() {
        return Err(Error::InvalidRowState("the row's table has no name"));
    }
    Ok(codec.quote_identifier(table.name()))
}

/// `"a" = 1, "b" = 'x'`
fn assignments<'a, C: ValueCodec + ?Sized>(
    codec: &C,
    values: impl Iterator<Item = (&'a String, &'a Value)>,
) -> Result<Vec<String>, Error> {
    values
        .map(|(column, value)| {
            Ok(format!(
                "{} = {}",
                codec.quote_identifier(column),
                codec.value_to_literal(value)?
            ))
        })
        .collect()
}

/// Conjunction matching every original column.
fn match_originals<C: ValueCodec + ?Sized>(
    codec: &C,
    table: &TableInfo,
    originals: &ColumnMap,
) -> Result<String, Error> {
    let mut predicates = Vec::with_capacity(originals.len());
    for (column, value) in originals {
        let quoted = codec.quote_identifier(column);
        let numeric = table
            .schema()
            .get(column)
            .is_some_and(|declared| codec.is_numeric_type(declared));
        predicates.push(if value.is_null() {
            format!("{quoted} IS NULL")
        } else if numeric {
            format!(
                "{} = {}",
                codec.numeric_cast(&quoted),
                codec.numeric_cast(&codec.value_to_literal(value)?)
            )
        } else {
            format!("{quoted} = {}", codec.value_to_literal(value)?)
        });
    }
    Ok(predicates.join(" AND "))
}

/// `WHERE <locator> IN (SELECT <locator> FROM <table> WHERE <originals> LIMIT 1)`
fn single_row_filter<C: ValueCodec + ?Sized>(
    codec: &C,
    table: &TableInfo,
    quoted: &str,
    originals: &ColumnMap,
) -> Result<String, Error> {
    let locator = codec.row_locator();
    Ok(format!(
        "WHERE {locator} IN (SELECT {locator} FROM {quoted} WHERE {} LIMIT 1)",
        match_originals(codec, table, originals)?
    ))
}

fn insert_statement<C: ValueCodec + ?Sized>(
    codec: &C,
    quoted: &str,
    values: &[(&String, &Value)],
) -> Result<String, Error> {
    let columns: Vec<String> = values
        .iter()
        .map(|(column, _)| codec.quote_identifier(column))
        .collect();
    let literals = values
        .iter()
        .map(|(_, value)| codec.value_to_literal(value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "INSERT INTO {quoted} ({}) VALUES ({});\n",
        columns.join(", "),
        literals.join(", ")
    ))
}

pub(crate) fn stateful<C: ValueCodec + ?Sized>(
    codec: &C,
    table: &TableInfo,
    originals: &ColumnMap,
    changes: &ColumnMap,
    deleted: bool,
) -> Result<Option<String>, Error> {
    let Some(action) = classify(originals.is_empty(), !changes.is_empty(), deleted) else {
        return Ok(None);
    };
    log::trace!("stateful {action:?} on {}", table.name());
    let quoted = quoted_table(codec, table)?;
    let sql = match action {
        SaveAction::Insert => {
            if !originals.is_empty() {
                return Err(Error::InvalidRowState(
                    "cannot insert a row that has original values",
                ));
            }
            if changes.is_empty() {
                return Err(Error::InvalidRowState("cannot insert a row without changes"));
            }
            let values: Vec<_> = changes.iter().collect();
            insert_statement(codec, &quoted, &values)?
        }
        SaveAction::Update => {
            if originals.is_empty() {
                return Err(Error::InvalidRowState("cannot update a new row"));
            }
            if changes.is_empty() {
                return Err(Error::InvalidRowState("cannot update a row without changes"));
            }
            format!(
                "UPDATE {quoted} SET {} {};\n",
                assignments(codec, changes.iter())?.join(", "),
                single_row_filter(codec, table, &quoted, originals)?
            )
        }
        SaveAction::Delete => {
            if originals.is_empty() {
                return Err(Error::InvalidRowState("cannot delete a new row"));
            }
            format!(
                "DELETE FROM {quoted} {};\n",
                single_row_filter(codec, table, &quoted, originals)?
            )
        }
    };
    Ok(Some(sql))
}

pub(crate) fn versioned<C: ValueCodec + ?Sized>(
    codec: &C,
    table: &TableInfo,
    values: &mut ColumnMap,
    deleted: bool,
) -> Result<Option<String>, Error> {
    // Defaults below must not count as modifications.
    let is_modified = !values.is_empty();
    if values.get(GUID).is_none_or(Value::is_null) {
        values.insert(GUID.to_string(), Value::Uuid(Uuid::new_v4()));
    }
    if values.get(VERSION).is_none_or(Value::is_null) {
        values.insert(VERSION.to_string(), Value::BigInt(0));
    }
    let version = values
        .get(VERSION)
        .and_then(Value::as_i64)
        .ok_or(Error::InvalidRowState("the Version column must hold an integer"))?;
    if deleted && version == 0 {
        return Err(Error::InvalidRowState("cannot delete a new row"));
    }

    let Some(action) = classify(version < 1, is_modified, deleted) else {
        return Ok(None);
    };
    log::trace!("versioned {action:?} on {} at version {version}", table.name());
    let quoted = quoted_table(codec, table)?;
    let guid = codec.value_to_literal(values.get(GUID).unwrap_or(&NULL))?;
    let version_column = codec.quote_identifier(VERSION);
    let key = format!(
        "WHERE {} = {guid} AND {version_column} = {version}",
        codec.quote_identifier(GUID)
    );
    let payload = values
        .iter()
        .filter(|(column, _)| column.as_str() != GUID && column.as_str() != VERSION);

    let sql = match action {
        SaveAction::Insert => {
            let mut columns: Vec<String> = Vec::with_capacity(values.len());
            let mut literals: Vec<String> = Vec::with_capacity(values.len());
            for (column, value) in payload {
                columns.push(codec.quote_identifier(column));
                literals.push(codec.value_to_literal(value)?);
            }
            columns.push(codec.quote_identifier(GUID));
            literals.push(guid);
            columns.push(version_column);
            literals.push("1".to_string());
            format!(
                "INSERT INTO {quoted} ({}) VALUES ({});\n",
                columns.join(", "),
                literals.join(", ")
            )
        }
        SaveAction::Update => {
            let next = version
                .checked_add(1)
                .ok_or(Error::InvalidRowState("the Version counter overflowed"))?;
            let mut sets = assignments(codec, payload)?;
            sets.push(format!("{version_column} = {next}"));
            format!("UPDATE {quoted} SET {} {key};\n", sets.join(", "))
        }
        SaveAction::Delete => format!("DELETE FROM {quoted} {key};\n"),
    };
    Ok(Some(sql))
}
