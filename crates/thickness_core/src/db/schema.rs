//! Reference table schema.
//!
//! # Invariants
//! - `PRAGMA user_version` is `0` on a fresh file and `SCHEMA_VERSION` once
//!   the tables are installed; any other value is refused.
//! - Installation and the version bump commit together.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Version recorded in `PRAGMA user_version` after installation.
pub const SCHEMA_VERSION: u32 = 1;

/// Tables every opened store must contain.
pub const REFERENCE_TABLES: [&str; 2] = ["orbital_properties", "material_properties"];

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Installs the reference tables on a fresh file and verifies the result.
///
/// # Errors
/// - `UnsupportedSchemaVersion` for a file from a newer build.
/// - `MissingTable` when an installed store lost a table.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    match user_version(conn)? {
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_SQL)?;
            tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
            tx.commit()?;
        }
        SCHEMA_VERSION => {}
        newer => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: newer,
                latest_supported: SCHEMA_VERSION,
            })
        }
    }
    verify_schema(conn)
}

/// Checks that `conn` holds the current schema without modifying it.
///
/// # Errors
/// - `SchemaNotInstalled` when the version is not `SCHEMA_VERSION`.
/// - `MissingTable` for the first reference table that does not exist.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    let actual_version = user_version(conn)?;
    if actual_version != SCHEMA_VERSION {
        return Err(DbError::SchemaNotInstalled {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    for table in REFERENCE_TABLES {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
