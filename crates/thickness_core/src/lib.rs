//! Core logic of the XPS film thickness calculator.
//! This crate owns the reference store and the thickness formula.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{load_config, AppConfig, ConfigError};
pub use engine::thickness::{
    calculate_thickness, mean_free_path, CalcError, InputViolation, LookupRole, ThicknessResult,
    RESULT_LABELS,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::inputs::{
    parse_number, parse_orbital_selection, AngleUnit, FormError, ThicknessForm, ThicknessInputs,
};
pub use model::reference::{MaterialRecord, OrbitalRecord, RecordValidationError};
pub use repo::reference_repo::{
    RecordKey, ReferenceRepository, RepoError, RepoResult, SqliteReferenceRepository,
};
pub use service::reference_service::{CalculateError, ReferenceService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
