//! Submodule defining the errors used across the crate.

use alloc::string::String;

use crate::settings::Setting;

/// Errors raised while configuring a session, rendering values or generating
/// and executing save statements.
///
/// Losing an optimistic-concurrency race is not an error: the save succeeds
/// and reports zero affected rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A setting the adapter needs was missing or empty when opening.
    #[error("{0} required for connection")]
    Configuration(Setting),
    /// Quoting or literal rendering was attempted without an open session.
    #[error("The connection is not open")]
    NotConnected,
    /// The value, or the backend cell being hydrated, has no literal mapping.
    #[error("Type not supported: {0}")]
    UnsupportedType(String),
    /// A row's state violates a precondition of the statement being generated.
    #[error("Invalid row state: {0}")]
    InvalidRowState(&'static str),
    /// Text that was expected to hold a decimal number did not parse.
    #[error("Invalid decimal literal `{0}`")]
    InvalidDecimal(String),
    /// The backend rejected a statement or failed to execute it.
    #[error("Backend error: {0}")]
    Backend(String),
}
