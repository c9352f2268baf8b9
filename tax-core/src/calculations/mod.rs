//! Tax calculation modules.
//!
//! Each calculator borrows the part of a [`crate::TaxYearConfig`] it needs and
//! holds no other state. [`TaxLiabilityResolver`] composes the others into a
//! single liability computation.

pub mod common;
mod expense;
mod liability;
mod limits;
mod minimum_tax;
mod planning;
mod progressive;
mod saving;

pub use expense::ExpenseDeductionResolver;
pub use liability::TaxLiabilityResolver;
pub use limits::DeductionLimitValidator;
pub use minimum_tax::AlternativeMinimumCalculator;
pub use planning::{Allocation, PlanTier, SavingPlanner};
pub use progressive::{MarginalRateLookup, ProgressiveTaxCalculator};
pub use saving::{DifferentialTaxSavingCalculator, SavingBreakdown};
