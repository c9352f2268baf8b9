use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{DeductionKind, IncomeCategory, IncomeSubtype, Violation};

/// Errors returned by [`crate::TaxEngine::compute_tax`] and the calculators
/// it composes.
///
/// Nothing here is transient; callers decide whether to reject the request
/// or fix the input and recompute.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A monetary input was negative, or too large to compute with.
    #[error("{field} is out of range, got {amount}")]
    InvalidInput { field: String, amount: Decimal },

    /// One or more deduction line items exceed their statutory cap.
    /// Carries every violation found, not just the first.
    #[error("{} deduction(s) exceed their statutory limit", .0.len())]
    DeductionLimitViolation(Vec<Violation>),

    #[error("income category {category} does not accept subtype {subtype}")]
    UnsupportedCategorySubtypeCombination {
        category: IncomeCategory,
        subtype: IncomeSubtype,
    },

    #[error("tax year {tax_year} has no cap rule for deduction {kind}")]
    UnknownDeduction { kind: DeductionKind, tax_year: i32 },
}

impl ValidationError {
    pub(crate) fn invalid_input(
        field: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            amount,
        }
    }
}
