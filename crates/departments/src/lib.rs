//! Departments domain module.
//!
//! Deterministic record rules only (no IO, no HTTP, no storage).

pub mod department;

pub use department::{Department, DepartmentUpdate};
