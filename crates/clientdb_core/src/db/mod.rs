//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the client store.
//! - Bring the `client`/`phone` schema up to the version this binary knows.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Every returned connection enforces foreign keys, so phone rows are
//!   removed together with their owning client.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub(crate) use open::bootstrap_connection;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `PRAGMA foreign_keys = ON` did not take effect, so client deletes
    /// would leave orphaned phone rows.
    ForeignKeysUnavailable,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "client database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::ForeignKeysUnavailable => {
                write!(f, "foreign key enforcement could not be enabled on this connection")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::ForeignKeysUnavailable => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
