//! Reference data and calculation use-case service.
//!
//! # Responsibility
//! - Provide add/list/lookup entry points taking plain field values.
//! - Run the thickness engine from typed inputs or raw form text.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::engine::thickness::{calculate_thickness, CalcError, ThicknessResult};
use crate::model::inputs::{FormError, ThicknessForm, ThicknessInputs};
use crate::model::reference::{MaterialRecord, OrbitalRecord};
use crate::repo::reference_repo::{ReferenceRepository, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a form-driven calculation.
#[derive(Debug)]
pub enum CalculateError {
    /// A text field is empty or non-numeric.
    Form(FormError),
    /// The engine rejected the parsed inputs.
    Calc(CalcError),
}

impl Display for CalculateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(err) => write!(f, "invalid input: {err}"),
            Self::Calc(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalculateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(err) => Some(err),
            Self::Calc(err) => Some(err),
        }
    }
}

impl From<FormError> for CalculateError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<CalcError> for CalculateError {
    fn from(value: CalcError) -> Self {
        Self::Calc(value)
    }
}

/// Use-case service wrapper around a reference repository.
pub struct ReferenceService<R: ReferenceRepository> {
    repo: R,
}

impl<R: ReferenceRepository> ReferenceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends an orbital cross-section record.
    ///
    /// Returns `DuplicateKey` when `(orbital_name, energy)` already exists.
    pub fn add_orbital(
        &self,
        orbital_name: &str,
        cross_section: f64,
        energy: f64,
    ) -> RepoResult<OrbitalRecord> {
        let record = OrbitalRecord::new(orbital_name, cross_section, energy);
        self.repo.add_orbital(&record)?;
        Ok(record)
    }

    /// Appends a material record.
    ///
    /// Returns `DuplicateKey` when `material_name` already exists.
    pub fn add_material(
        &self,
        material_name: &str,
        density: f64,
        molar_mass: f64,
    ) -> RepoResult<MaterialRecord> {
        let record = MaterialRecord::new(material_name, density, molar_mass);
        self.repo.add_material(&record)?;
        Ok(record)
    }

    pub fn lookup_cross_section(&self, orbital_name: &str, energy: f64) -> RepoResult<Option<f64>> {
        self.repo.lookup_cross_section(orbital_name, energy)
    }

    pub fn lookup_density(&self, material_name: &str) -> RepoResult<Option<f64>> {
        self.repo.lookup_density(material_name)
    }

    pub fn lookup_molar_mass(&self, material_name: &str) -> RepoResult<Option<f64>> {
        self.repo.lookup_molar_mass(material_name)
    }

    /// Lists orbitals in insertion order.
    pub fn list_orbitals(&self) -> RepoResult<Vec<OrbitalRecord>> {
        self.repo.list_orbitals()
    }

    /// Lists materials in insertion order.
    pub fn list_materials(&self) -> RepoResult<Vec<MaterialRecord>> {
        self.repo.list_materials()
    }

    /// Selection-list labels for every orbital, in insertion order.
    pub fn orbital_labels(&self) -> RepoResult<Vec<String>> {
        Ok(self
            .repo
            .list_orbitals()?
            .iter()
            .map(OrbitalRecord::display_label)
            .collect())
    }

    /// Runs the engine on typed inputs.
    pub fn calculate(&self, inputs: &ThicknessInputs) -> Result<ThicknessResult, CalcError> {
        calculate_thickness(inputs, &self.repo)
    }

    /// Parses raw form text, then runs the engine.
    pub fn calculate_form(&self, form: &ThicknessForm) -> Result<ThicknessResult, CalculateError> {
        let inputs = form.parse()?;
        Ok(self.calculate(&inputs)?)
    }
}
