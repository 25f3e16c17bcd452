use rusqlite::Connection;
use thickness_core::db::schema::SCHEMA_VERSION;
use thickness_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_installs_reference_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "orbital_properties");
    assert_table_exists(&conn, "material_properties");
}

#[test]
fn first_open_seeds_default_rows() {
    let conn = open_db_in_memory().unwrap();

    let orbital: (String, f64, f64) = conn
        .query_row(
            "SELECT orbital, cross_section, energy FROM orbital_properties;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(orbital, ("Mo3d".to_string(), 0.1303, 1486.6));

    let material: (String, f64, f64) = conn
        .query_row(
            "SELECT material_name, density, molar_mass FROM material_properties;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(material, ("MoS2".to_string(), 5.06, 160.07));
}

#[test]
fn reopening_does_not_reseed_or_lose_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thickness.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO material_properties (material_name, density, molar_mass)
             VALUES ('WS2', 7.5, 247.97);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), SCHEMA_VERSION);
    assert_eq!(row_count(&conn_second, "orbital_properties"), 1);
    assert_eq!(row_count(&conn_second, "material_properties"), 2);
}

#[test]
fn emptied_table_is_seeded_again_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thickness.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute("DELETE FROM orbital_properties;", []).unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(row_count(&conn, "orbital_properties"), 1);
    assert_eq!(row_count(&conn, "material_properties"), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_store_with_dropped_table_returns_missing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thickness.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute_batch("DROP TABLE material_properties;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingTable("material_properties")));
}

#[test]
fn opening_unreachable_path_returns_sqlite_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("thickness.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
