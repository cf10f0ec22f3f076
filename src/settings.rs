//! Session settings handed to an adapter when a connection opens.

use alloc::string::String;
use core::fmt;
use core::time::Duration;

use crate::errors::Error;

/// Default port, matching the PostgreSQL convention the settings were modelled on.
pub const DEFAULT_PORT: u16 = 5432;

/// Default timeout applied to session establishment and each statement.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A setting an adapter may require before it can open a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Server name or network address.
    Server,
    /// Database name (or file path for embedded backends).
    Database,
    /// User name used for authentication.
    User,
    /// Credential used for authentication.
    Password,
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Setting::Server => "Server",
            Setting::Database => "Database",
            Setting::User => "User",
            Setting::Password => "Password",
        })
    }
}

/// Connection settings.
///
/// Fields that a backend does not need are ignored by it; see
/// [`Adapter::REQUIRED`](crate::Adapter::REQUIRED) for what each backend
/// validates before opening.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Server name or network address.
    pub server: Option<String>,
    /// Server port.
    pub port: u16,
    /// Database name, or the database file for embedded backends.
    pub database: Option<String>,
    /// User name.
    pub user: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    password: Option<String>,
    /// Timeout for session establishment and statements.
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: None,
            port: DEFAULT_PORT,
            database: None,
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Settings {
    /// Creates settings with the default port and timeout and nothing else set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the database.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the password.
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// Returns the password, if one was provided.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn value_of(&self, setting: Setting) -> Option<&str> {
        match setting {
            Setting::Server => self.server.as_deref(),
            Setting::Database => self.database.as_deref(),
            Setting::User => self.user.as_deref(),
            Setting::Password => self.password.as_deref(),
        }
    }

    /// Checks that every listed setting is present and non-empty.
    ///
    /// # Errors
    ///
    /// * `Configuration` - naming the first setting that is missing or empty.
    pub fn require(&self, required: &[Setting]) -> Result<(), Error> {
        match required
            .iter()
            .find(|setting| self.value_of(**setting).is_none_or(str::is_empty))
        {
            Some(setting) => Err(Error::Configuration(*setting)),
            None => Ok(()),
        }
    }
}
