//! Engine input bundle and its text-field form.
//!
//! # Responsibility
//! - Define `ThicknessInputs`, the typed bundle consumed by the engine.
//! - Parse raw text fields (as typed by a user) into that bundle.
//!
//! # Invariants
//! - Parsing never substitutes a default for an empty field; defaults only
//!   exist as the initial text of a fresh form.
//! - Fields are parsed in declaration order and the first failure wins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Al Kα excitation line, the initial text of the excitation field.
pub const DEFAULT_EXCITATION_ENERGY_TEXT: &str = "1486.6";
/// Normal emission, the initial text of the angle field.
pub const DEFAULT_MEASUREMENT_ANGLE_TEXT: &str = "0";

static ORBITAL_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<name>.+?)\s*@\s*[-+0-9.eE]+\s*(?:eV)?\s*$")
        .expect("valid orbital label regex")
});

/// Typed inputs for one thickness evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ThicknessInputs {
    pub excitation_energy_ev: f64,
    pub binding_energy_ev: f64,
    pub film_material: String,
    pub substrate_material: String,
    pub film_orbital: String,
    pub substrate_orbital: String,
    /// Emitting atoms per formula unit of the film.
    pub n_film: f64,
    /// Emitting atoms per formula unit of the substrate.
    pub n_substrate: f64,
    pub i_film: f64,
    pub i_substrate: f64,
    /// Radians from the surface normal.
    pub measurement_angle: f64,
}

/// Unit of the angle text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

/// Raw text of every calculation field.
///
/// Orbital fields accept either a bare orbital name or a selection label
/// such as `Mo3d @ 1486.6 eV`; only the name part is kept. The cross-section
/// energy always comes from the excitation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThicknessForm {
    pub excitation_energy: String,
    pub binding_energy: String,
    pub film_material: String,
    pub substrate_material: String,
    pub film_orbital: String,
    pub substrate_orbital: String,
    pub n_film: String,
    pub n_substrate: String,
    pub i_film: String,
    pub i_substrate: String,
    pub measurement_angle: String,
    pub angle_unit: AngleUnit,
}

impl Default for ThicknessForm {
    fn default() -> Self {
        Self {
            excitation_energy: DEFAULT_EXCITATION_ENERGY_TEXT.to_string(),
            binding_energy: String::new(),
            film_material: String::new(),
            substrate_material: String::new(),
            film_orbital: String::new(),
            substrate_orbital: String::new(),
            n_film: String::new(),
            n_substrate: String::new(),
            i_film: String::new(),
            i_substrate: String::new(),
            measurement_angle: DEFAULT_MEASUREMENT_ANGLE_TEXT.to_string(),
            angle_unit: AngleUnit::Radians,
        }
    }
}

/// Text-field parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Field is empty after trimming.
    EmptyField(&'static str),
    /// Field text is not a finite number.
    NotANumber { field: &'static str, text: String },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} is required"),
            Self::NotANumber { field, text } => {
                write!(f, "{field} must be a number, got `{text}`")
            }
        }
    }
}

impl Error for FormError {}

impl ThicknessForm {
    /// Parses every field into a typed input bundle.
    ///
    /// # Errors
    /// - `EmptyField` for a blank field.
    /// - `NotANumber` for numeric text that does not parse to a finite value.
    pub fn parse(&self) -> Result<ThicknessInputs, FormError> {
        let excitation_energy_ev = parse_number("excitation energy", &self.excitation_energy)?;
        let binding_energy_ev = parse_number("binding energy", &self.binding_energy)?;
        let film_material = parse_name("film material", &self.film_material)?;
        let substrate_material = parse_name("substrate material", &self.substrate_material)?;
        let film_orbital = parse_orbital_selection(&parse_name("film orbital", &self.film_orbital)?);
        let substrate_orbital =
            parse_orbital_selection(&parse_name("substrate orbital", &self.substrate_orbital)?);
        let n_film = parse_number("N film", &self.n_film)?;
        let n_substrate = parse_number("N substrate", &self.n_substrate)?;
        let i_film = parse_number("I film", &self.i_film)?;
        let i_substrate = parse_number("I substrate", &self.i_substrate)?;
        let angle = parse_number("measurement angle", &self.measurement_angle)?;
        let measurement_angle = match self.angle_unit {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_radians(),
        };

        Ok(ThicknessInputs {
            excitation_energy_ev,
            binding_energy_ev,
            film_material,
            substrate_material,
            film_orbital,
            substrate_orbital,
            n_film,
            n_substrate,
            i_film,
            i_substrate,
            measurement_angle,
        })
    }
}

/// Extracts the orbital name from a selection label.
///
/// `"Mo3d @ 1486.6 eV"` yields `"Mo3d"`; text without the ` @ <energy>`
/// suffix is returned trimmed.
pub fn parse_orbital_selection(value: &str) -> String {
    ORBITAL_LABEL_RE
        .captures(value)
        .and_then(|caps| caps.name("name").map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| value.trim().to_string())
}

fn parse_name(field: &'static str, text: &str) -> Result<String, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Parses one numeric text field, trimming surrounding whitespace.
///
/// # Errors
/// - `EmptyField` for blank text.
/// - `NotANumber` for text that is not a finite number.
pub fn parse_number(field: &'static str, text: &str) -> Result<f64, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormError::EmptyField(field));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::NotANumber {
            field,
            text: trimmed.to_string(),
        }),
    }
}
