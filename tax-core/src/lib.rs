//! Personal income tax engine.
//!
//! Computes liability under a progressive bracket schedule with
//! category-specific expense deductions, capped personal deductions and a
//! flat minimum tax, and prices hypothetical extra deductions by full
//! recomputation of the schedule.

pub mod calculations;
pub mod error;
pub mod models;

mod engine;
mod registry;

pub use engine::TaxEngine;
pub use error::ValidationError;
pub use models::*;
pub use registry::{RegistryError, TaxYearRegistry};
