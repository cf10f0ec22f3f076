#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod adapter;
pub mod codec;
pub mod connection;
pub mod errors;
pub mod parameters;
pub mod record;
pub mod row;
pub mod settings;
pub mod table;
pub mod value;

// Re-export main types
pub use adapter::{Adapter, SaveAction, classify};
#[cfg(feature = "sqlite")]
pub use adapter::{SqliteAdapter, SqliteCodec};
pub use codec::ValueCodec;
pub use connection::Connection;
pub use parameters::Parameters;
pub use record::{Column, ColumnMap, Record, RecordSet, Schema};
pub use row::{
    Row, RowFactory, RowState, StatefulRow, StatefulRowFactory, VersionedRow, VersionedRowFactory,
};
pub use settings::{Setting, Settings};
pub use table::{StatefulTable, Table, TableInfo, VersionedTable};
pub use value::{Decimal, Value};

// Re-export errors
pub use errors::Error;
