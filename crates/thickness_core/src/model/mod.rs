//! Domain model for reference data and calculation inputs.
//!
//! # Responsibility
//! - Define the persisted reference records (orbitals, materials).
//! - Define the engine input bundle and its text-form counterpart.
//!
//! # Invariants
//! - Record identity is the name (plus energy for orbitals); there are no
//!   surrogate IDs in the public model.

pub mod inputs;
pub mod reference;
