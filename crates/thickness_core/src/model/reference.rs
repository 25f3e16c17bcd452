//! Reference records stored in the local SQLite store.
//!
//! # Responsibility
//! - Define `OrbitalRecord` and `MaterialRecord`.
//! - Validate records before they are persisted.
//!
//! # Invariants
//! - Names are trimmed and non-empty.
//! - Every stored physical quantity is finite and strictly positive.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Photoionization cross-section of one orbital at one excitation energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalRecord {
    /// Orbital label, e.g. `Mo3d`.
    pub orbital_name: String,
    /// Excitation energy in eV. Part of the record key.
    pub excitation_energy: f64,
    /// Tabulated photoionization cross-section.
    pub cross_section: f64,
}

/// Bulk properties of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Unique material name, e.g. `MoS2`.
    pub material_name: String,
    /// Mass density in g/cm³.
    pub density: f64,
    /// Molar mass in g/mol.
    pub molar_mass: f64,
}

/// Validation failure for a reference record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    /// Name is empty after trimming.
    EmptyName(&'static str),
    /// Quantity is NaN, infinite, zero or negative.
    NonPositive { field: &'static str, value: f64 },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(field) => write!(f, "{field} cannot be empty"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be a finite positive number, got {value}")
            }
        }
    }
}

impl Error for RecordValidationError {}

impl OrbitalRecord {
    /// Builds a record with a trimmed orbital name.
    pub fn new(orbital_name: impl AsRef<str>, cross_section: f64, excitation_energy: f64) -> Self {
        Self {
            orbital_name: orbital_name.as_ref().trim().to_string(),
            excitation_energy,
            cross_section,
        }
    }

    /// Checks name and quantity invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_name("orbital name", &self.orbital_name)?;
        require_positive("cross section", self.cross_section)?;
        require_positive("excitation energy", self.excitation_energy)?;
        Ok(())
    }

    /// Label shown in selection lists, e.g. `Mo3d @ 1486.6 eV`.
    pub fn display_label(&self) -> String {
        format!("{} @ {} eV", self.orbital_name, self.excitation_energy)
    }
}

impl MaterialRecord {
    /// Builds a record with a trimmed material name.
    pub fn new(material_name: impl AsRef<str>, density: f64, molar_mass: f64) -> Self {
        Self {
            material_name: material_name.as_ref().trim().to_string(),
            density,
            molar_mass,
        }
    }

    /// Checks name and quantity invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_name("material name", &self.material_name)?;
        require_positive("density", self.density)?;
        require_positive("molar mass", self.molar_mass)?;
        Ok(())
    }
}

fn require_name(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::EmptyName(field));
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<(), RecordValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RecordValidationError::NonPositive { field, value });
    }
    Ok(())
}
