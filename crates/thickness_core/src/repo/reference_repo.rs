//! Reference store contract and SQLite implementation.
//!
//! # Responsibility
//! - Answer exact-match point lookups over orbitals and materials.
//! - Append new records, mapping unique-constraint hits to `DuplicateKey`.
//!
//! # Invariants
//! - Orbital energy is matched by exact floating-point equality.
//! - Records are append-only; there is no update or delete path.
//! - Names are written trimmed, whatever the caller passed in.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::schema::verify_schema;
use crate::db::DbError;
use crate::model::reference::{MaterialRecord, OrbitalRecord, RecordValidationError};
use log::{info, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Identity of a reference record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKey {
    Orbital { name: String, energy: f64 },
    Material { name: String },
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Orbital { name, energy } => write!(f, "orbital `{name}` @ {energy} eV"),
            Self::Material { name } => write!(f, "material `{name}`"),
        }
    }
}

/// Repository error for reference lookups and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    DuplicateKey(RecordKey),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateKey(key) => write!(f, "{key} already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted reference data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lookup and append contract of the reference store.
pub trait ReferenceRepository {
    fn lookup_cross_section(&self, orbital_name: &str, energy: f64) -> RepoResult<Option<f64>>;
    fn lookup_density(&self, material_name: &str) -> RepoResult<Option<f64>>;
    fn lookup_molar_mass(&self, material_name: &str) -> RepoResult<Option<f64>>;
    fn add_orbital(&self, record: &OrbitalRecord) -> RepoResult<()>;
    fn add_material(&self, record: &MaterialRecord) -> RepoResult<()>;
    fn list_orbitals(&self) -> RepoResult<Vec<OrbitalRecord>>;
    fn list_materials(&self) -> RepoResult<Vec<MaterialRecord>>;
}

impl<R: ReferenceRepository + ?Sized> ReferenceRepository for &R {
    fn lookup_cross_section(&self, orbital_name: &str, energy: f64) -> RepoResult<Option<f64>> {
        (**self).lookup_cross_section(orbital_name, energy)
    }

    fn lookup_density(&self, material_name: &str) -> RepoResult<Option<f64>> {
        (**self).lookup_density(material_name)
    }

    fn lookup_molar_mass(&self, material_name: &str) -> RepoResult<Option<f64>> {
        (**self).lookup_molar_mass(material_name)
    }

    fn add_orbital(&self, record: &OrbitalRecord) -> RepoResult<()> {
        (**self).add_orbital(record)
    }

    fn add_material(&self, record: &MaterialRecord) -> RepoResult<()> {
        (**self).add_material(record)
    }

    fn list_orbitals(&self) -> RepoResult<Vec<OrbitalRecord>> {
        (**self).list_orbitals()
    }

    fn list_materials(&self) -> RepoResult<Vec<MaterialRecord>> {
        (**self).list_materials()
    }
}

/// SQLite-backed reference repository borrowing the process store handle.
pub struct SqliteReferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReferenceRepository<'conn> {
    /// Wraps a connection after checking it was opened through `open_db`.
    ///
    /// # Errors
    /// - `Db(SchemaNotInstalled)` when the schema version is not current.
    /// - `Db(MissingTable)` when a reference table does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn)?;
        Ok(Self { conn })
    }
}

impl ReferenceRepository for SqliteReferenceRepository<'_> {
    fn lookup_cross_section(&self, orbital_name: &str, energy: f64) -> RepoResult<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT cross_section FROM orbital_properties
                 WHERE orbital = ?1 AND energy = ?2;",
                params![orbital_name, energy],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn lookup_density(&self, material_name: &str) -> RepoResult<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT density FROM material_properties WHERE material_name = ?1;",
                [material_name],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn lookup_molar_mass(&self, material_name: &str) -> RepoResult<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT molar_mass FROM material_properties WHERE material_name = ?1;",
                [material_name],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn add_orbital(&self, record: &OrbitalRecord) -> RepoResult<()> {
        let record = OrbitalRecord::new(
            &record.orbital_name,
            record.cross_section,
            record.excitation_energy,
        );
        record.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO orbital_properties (orbital, cross_section, energy)
             VALUES (?1, ?2, ?3);",
            params![
                record.orbital_name.as_str(),
                record.cross_section,
                record.excitation_energy
            ],
        );
        map_insert_result(
            inserted,
            RecordKey::Orbital {
                name: record.orbital_name.clone(),
                energy: record.excitation_energy,
            },
        )?;

        info!("event=reference_add module=repo status=ok kind=orbital");
        Ok(())
    }

    fn add_material(&self, record: &MaterialRecord) -> RepoResult<()> {
        let record = MaterialRecord::new(&record.material_name, record.density, record.molar_mass);
        record.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO material_properties (material_name, density, molar_mass)
             VALUES (?1, ?2, ?3);",
            params![record.material_name.as_str(), record.density, record.molar_mass],
        );
        map_insert_result(
            inserted,
            RecordKey::Material {
                name: record.material_name.clone(),
            },
        )?;

        info!("event=reference_add module=repo status=ok kind=material");
        Ok(())
    }

    fn list_orbitals(&self) -> RepoResult<Vec<OrbitalRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT orbital, cross_section, energy
             FROM orbital_properties
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_orbital_row(row)?);
        }
        Ok(records)
    }

    fn list_materials(&self) -> RepoResult<Vec<MaterialRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT material_name, density, molar_mass
             FROM material_properties
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_material_row(row)?);
        }
        Ok(records)
    }
}

fn map_insert_result(result: rusqlite::Result<usize>, key: RecordKey) -> RepoResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            warn!("event=reference_add module=repo status=error error_code=duplicate_key");
            Err(RepoError::DuplicateKey(key))
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_orbital_row(row: &Row<'_>) -> RepoResult<OrbitalRecord> {
    let record = OrbitalRecord {
        orbital_name: row.get("orbital")?,
        excitation_energy: row.get("energy")?,
        cross_section: row.get("cross_section")?,
    };
    record.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "orbital `{}` in orbital_properties: {err}",
            record.orbital_name
        ))
    })?;
    Ok(record)
}

fn parse_material_row(row: &Row<'_>) -> RepoResult<MaterialRecord> {
    let record = MaterialRecord {
        material_name: row.get("material_name")?,
        density: row.get("density")?,
        molar_mass: row.get("molar_mass")?,
    };
    record.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "material `{}` in material_properties: {err}",
            record.material_name
        ))
    })?;
    Ok(record)
}
