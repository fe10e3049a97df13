//! Shared types and models for the Restaurant Inventory Management Platform
//!
//! This crate contains the domain types and the pure stock/recipe rules
//! shared between the backend and any client of the system. Nothing in here
//! performs I/O; the backend wires these rules to Postgres.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
