//! Thickness engine.
//!
//! # Responsibility
//! - Evaluate the overlayer thickness formula over a typed input bundle.
//! - Resolve reference values through the `ReferenceRepository` contract.
//!
//! # Invariants
//! - Evaluation is a pure function of inputs and store contents.
//! - Evaluation order is fixed, so error precedence is deterministic.

pub mod thickness;
