//! Repository layer for reference data.
//!
//! # Responsibility
//! - Define the lookup/add/list contract of the reference store.
//! - Isolate SQLite query details from the engine and services.
//!
//! # Invariants
//! - Writes validate records before any SQL mutation.
//! - A lookup miss is `Ok(None)`, never a default value.

pub mod reference_repo;
