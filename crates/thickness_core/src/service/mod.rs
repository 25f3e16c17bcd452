//! Use-case services over the reference store and engine.
//!
//! # Responsibility
//! - Orchestrate repository calls and engine evaluation for front ends.
//! - Keep front ends decoupled from storage details.

pub mod reference_service;
