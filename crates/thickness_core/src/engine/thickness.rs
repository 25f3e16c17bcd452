//! Overlayer thickness from XPS intensity ratios.
//!
//! The film thickness `d` follows from the attenuation of substrate
//! photoelectrons by the film:
//!
//! ```text
//! d = λ · cos θ · ln(1 + (I_f · σ_s · V_f) / (I_s · σ_f · V_s))
//! ```
//!
//! with `λ = (49 / E_k² + 0.11 · √E_k) / ρ_film` and `V = M / (ρ · N)` the
//! volume per emitting atom.
//!
//! # Invariants
//! - A lookup miss aborts evaluation; no fallback value is ever used.
//! - Non-finite intermediates and outputs are rejected, never returned.

use crate::model::inputs::ThicknessInputs;
use crate::repo::reference_repo::{RecordKey, ReferenceRepository, RepoError, RepoResult};
use log::{debug, error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Display labels for the ordered result tuple.
pub const RESULT_LABELS: [&str; 4] = [
    "mean free path",
    "emitter substrate",
    "emitter film",
    "layer thickness",
];

/// Which reference value a lookup was resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRole {
    FilmDensity,
    SubstrateMolarMass,
    SubstrateDensity,
    FilmMolarMass,
    SubstrateCrossSection,
    FilmCrossSection,
}

impl Display for LookupRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::FilmDensity => "film density",
            Self::SubstrateMolarMass => "substrate molar mass",
            Self::SubstrateDensity => "substrate density",
            Self::FilmMolarMass => "film molar mass",
            Self::SubstrateCrossSection => "substrate cross section",
            Self::FilmCrossSection => "film cross section",
        };
        f.write_str(label)
    }
}

/// Violated numeric precondition.
#[derive(Debug, Clone, PartialEq)]
pub enum InputViolation {
    /// Input field is NaN or infinite.
    NonFiniteInput { field: &'static str, value: f64 },
    /// Atom count or intensity is zero or negative.
    NonPositiveInput { field: &'static str, value: f64 },
    /// Excitation energy does not exceed binding energy.
    NonPositiveKineticEnergy { kinetic_energy: f64 },
    /// Intermediate or output quantity is NaN or infinite.
    NonFiniteQuantity { quantity: &'static str, value: f64 },
    /// `1 + intensity_ratio_term` is zero or negative.
    NonPositiveLogArgument { argument: f64 },
}

impl Display for InputViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteInput { field, value } => {
                write!(f, "{field} must be finite, got {value}")
            }
            Self::NonPositiveInput { field, value } => {
                write!(f, "{field} must be greater than zero, got {value}")
            }
            Self::NonPositiveKineticEnergy { kinetic_energy } => write!(
                f,
                "kinetic energy must be greater than zero (excitation minus binding energy), got {kinetic_energy} eV"
            ),
            Self::NonFiniteQuantity { quantity, value } => {
                write!(f, "{quantity} is not finite ({value})")
            }
            Self::NonPositiveLogArgument { argument } => write!(
                f,
                "1 + intensity ratio term must be greater than zero, got {argument}"
            ),
        }
    }
}

/// Engine failure; always the first unmet precondition.
#[derive(Debug)]
pub enum CalcError {
    Validation(InputViolation),
    Lookup { role: LookupRole, key: RecordKey },
    StoreUnavailable(RepoError),
}

impl CalcError {
    /// Stable code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Lookup { .. } => "lookup_missing",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl Display for CalcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(violation) => write!(f, "invalid input: {violation}"),
            Self::Lookup { role, key } => write!(f, "{role} not found: {key}"),
            Self::StoreUnavailable(err) => write!(f, "reference store unavailable: {err}"),
        }
    }
}

impl Error for CalcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InputViolation> for CalcError {
    fn from(value: InputViolation) -> Self {
        Self::Validation(value)
    }
}

/// Ordered engine output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThicknessResult {
    /// Inelastic mean free path.
    pub mean_free_path: f64,
    /// `1 / emitter_density_substrate`.
    pub emitter_substrate: f64,
    /// `1 / emitter_density_film`.
    pub emitter_film: f64,
    /// Overlayer thickness, same length unit as `mean_free_path`.
    pub thickness: f64,
}

impl ThicknessResult {
    /// Values in display order.
    pub fn values(&self) -> [f64; 4] {
        [
            self.mean_free_path,
            self.emitter_substrate,
            self.emitter_film,
            self.thickness,
        ]
    }

    /// Values paired with their fixed display labels.
    pub fn labeled(&self) -> [(&'static str, f64); 4] {
        let values = self.values();
        [
            (RESULT_LABELS[0], values[0]),
            (RESULT_LABELS[1], values[1]),
            (RESULT_LABELS[2], values[2]),
            (RESULT_LABELS[3], values[3]),
        ]
    }
}

/// Inelastic mean free path for kinetic energy `kinetic_energy` (eV) in a
/// material of density `density` (g/cm³).
pub fn mean_free_path(kinetic_energy: f64, density: f64) -> f64 {
    (49.0 / kinetic_energy.powi(2) + 0.11 * kinetic_energy.sqrt()) / density
}

/// Computes mean free path, emitter volumes and layer thickness.
///
/// # Errors
/// - `Validation` for a violated numeric precondition.
/// - `Lookup` for the first reference key missing from the store.
/// - `StoreUnavailable` when the store itself fails.
///
/// # Side effects
/// - Emits one `thickness_calc` log event with status and duration.
pub fn calculate_thickness<R>(
    inputs: &ThicknessInputs,
    repo: &R,
) -> Result<ThicknessResult, CalcError>
where
    R: ReferenceRepository + ?Sized,
{
    let started_at = Instant::now();
    match evaluate(inputs, repo) {
        Ok(result) => {
            info!(
                "event=thickness_calc module=engine status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(result)
        }
        Err(err) => {
            error!(
                "event=thickness_calc module=engine status=error duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                err.error_code()
            );
            Err(err)
        }
    }
}

fn evaluate<R>(inputs: &ThicknessInputs, repo: &R) -> Result<ThicknessResult, CalcError>
where
    R: ReferenceRepository + ?Sized,
{
    check_inputs(inputs)?;

    let kinetic_energy = inputs.excitation_energy_ev - inputs.binding_energy_ev;
    if kinetic_energy <= 0.0 {
        return Err(InputViolation::NonPositiveKineticEnergy { kinetic_energy }.into());
    }

    let density_film = required(
        repo.lookup_density(&inputs.film_material),
        LookupRole::FilmDensity,
        material_key(&inputs.film_material),
    )?;
    let mfp = finite("mean free path", mean_free_path(kinetic_energy, density_film))?;

    let molar_mass_substrate = required(
        repo.lookup_molar_mass(&inputs.substrate_material),
        LookupRole::SubstrateMolarMass,
        material_key(&inputs.substrate_material),
    )?;
    let density_substrate = required(
        repo.lookup_density(&inputs.substrate_material),
        LookupRole::SubstrateDensity,
        material_key(&inputs.substrate_material),
    )?;
    let emitter_density_substrate = finite(
        "emitter density substrate",
        molar_mass_substrate / (density_substrate * inputs.n_substrate),
    )?;

    let molar_mass_film = required(
        repo.lookup_molar_mass(&inputs.film_material),
        LookupRole::FilmMolarMass,
        material_key(&inputs.film_material),
    )?;
    let emitter_density_film = finite(
        "emitter density film",
        molar_mass_film / (density_film * inputs.n_film),
    )?;

    let cross_section_substrate = required(
        repo.lookup_cross_section(&inputs.substrate_orbital, inputs.excitation_energy_ev),
        LookupRole::SubstrateCrossSection,
        orbital_key(&inputs.substrate_orbital, inputs.excitation_energy_ev),
    )?;
    let cross_section_film = required(
        repo.lookup_cross_section(&inputs.film_orbital, inputs.excitation_energy_ev),
        LookupRole::FilmCrossSection,
        orbital_key(&inputs.film_orbital, inputs.excitation_energy_ev),
    )?;

    let intensity_ratio_term = finite(
        "intensity ratio term",
        (inputs.i_film * cross_section_substrate * emitter_density_film)
            / (inputs.i_substrate * cross_section_film * emitter_density_substrate),
    )?;
    let log_argument = 1.0 + intensity_ratio_term;
    if log_argument <= 0.0 {
        return Err(InputViolation::NonPositiveLogArgument {
            argument: log_argument,
        }
        .into());
    }
    debug!(
        "event=thickness_calc module=engine status=progress kinetic_energy={} ratio_term={}",
        kinetic_energy, intensity_ratio_term
    );

    let thickness = mfp * inputs.measurement_angle.cos() * log_argument.ln();

    Ok(ThicknessResult {
        mean_free_path: mfp,
        emitter_substrate: finite("emitter substrate", 1.0 / emitter_density_substrate)?,
        emitter_film: finite("emitter film", 1.0 / emitter_density_film)?,
        thickness: finite("layer thickness", thickness)?,
    })
}

fn check_inputs(inputs: &ThicknessInputs) -> Result<(), InputViolation> {
    let finite_fields = [
        ("excitation energy", inputs.excitation_energy_ev),
        ("binding energy", inputs.binding_energy_ev),
        ("N film", inputs.n_film),
        ("N substrate", inputs.n_substrate),
        ("I film", inputs.i_film),
        ("I substrate", inputs.i_substrate),
        ("measurement angle", inputs.measurement_angle),
    ];
    for (field, value) in finite_fields {
        if !value.is_finite() {
            return Err(InputViolation::NonFiniteInput { field, value });
        }
    }

    let positive_fields = [
        ("N film", inputs.n_film),
        ("N substrate", inputs.n_substrate),
        ("I film", inputs.i_film),
        ("I substrate", inputs.i_substrate),
    ];
    for (field, value) in positive_fields {
        if value <= 0.0 {
            return Err(InputViolation::NonPositiveInput { field, value });
        }
    }
    Ok(())
}

fn required(lookup: RepoResult<Option<f64>>, role: LookupRole, key: RecordKey) -> Result<f64, CalcError> {
    match lookup {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(CalcError::Lookup { role, key }),
        Err(err) => Err(CalcError::StoreUnavailable(err)),
    }
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, InputViolation> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputViolation::NonFiniteQuantity { quantity, value })
    }
}

fn material_key(name: &str) -> RecordKey {
    RecordKey::Material {
        name: name.to_string(),
    }
}

fn orbital_key(name: &str, energy: f64) -> RecordKey {
    RecordKey::Orbital {
        name: name.to_string(),
        energy,
    }
}
