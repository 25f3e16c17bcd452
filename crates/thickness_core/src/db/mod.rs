//! Reference store bootstrap.
//!
//! Opening a store installs the two reference tables on a fresh file,
//! refuses files written by a newer build, confirms both tables are present
//! and fills any empty table with its default row. Only after all of that
//! does a caller receive the connection.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;
pub mod seed;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, install or verify the reference store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open or query the file.
    Sqlite(rusqlite::Error),
    /// File carries a schema version this build does not know.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was not bootstrapped through `open_db`.
    SchemaNotInstalled {
        expected_version: u32,
        actual_version: u32,
    },
    /// Schema version matches but a reference table is gone.
    MissingTable(&'static str),
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
                "reference store was written by a newer build (schema {db_version}, this build supports {latest_supported})"
            ),
            Self::SchemaNotInstalled {
                expected_version,
                actual_version,
            } => write!(
                f,
                "reference store schema is at version {actual_version}, expected {expected_version}"
            ),
            Self::MissingTable(table) => write!(f, "reference table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
