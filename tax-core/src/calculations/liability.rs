//! Liability resolution for a single request.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1 | Reject negative inputs and deductions whose multiplier overflows |
//! | 2 | Classify category and subtype into an [`IncomeSource`] |
//! | 3 | Validate every deduction line item against its cap |
//! | 4 | Expense deduction for the income source |
//! | 5 | Taxable income (gross - expense - capped deductions, minimum 0) |
//! | 6 | Progressive tax on taxable income |
//! | 7 | Minimum tax on gross income, if the category is subject to it |
//! | 8 | Final tax: minimum tax if it counts and is higher, else progressive |
//! | 9 | Effective rate (final tax / gross income) |

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::calculations::{
    AlternativeMinimumCalculator, DeductionLimitValidator, ExpenseDeductionResolver,
    ProgressiveTaxCalculator,
};
use crate::error::ValidationError;
use crate::models::{ExpenseMethod, IncomeSource, TaxRequest, TaxResult, TaxYearConfig};

/// Computes a [`TaxResult`] from a [`TaxRequest`] under one tax year.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::TaxLiabilityResolver;
/// use tax_core::{DeductionKind, IncomeCategory, TaxMethod, TaxRequest, TaxYearConfig};
///
/// let config = TaxYearConfig::year_2025();
/// let allowance = config.line_item(DeductionKind::PersonalAllowance, dec!(60000)).unwrap();
/// let request = TaxRequest::new(dec!(600000), IncomeCategory::Wages).with_deduction(allowance);
///
/// let result = TaxLiabilityResolver::new(&config).resolve(&request).unwrap();
///
/// assert_eq!(result.expense_deduction, dec!(100000));
/// assert_eq!(result.taxable_income, dec!(440000));
/// assert_eq!(result.tax_amount, dec!(21500));
/// assert_eq!(result.method, TaxMethod::Progressive);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaxLiabilityResolver<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> TaxLiabilityResolver<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Resolves the liability for `request`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidInput`] for a negative monetary input, or a
    ///   deduction whose multiplier pushes it past [`Decimal::MAX`].
    /// - [`ValidationError::UnsupportedCategorySubtypeCombination`] when the
    ///   subtype does not belong to the category.
    /// - [`ValidationError::DeductionLimitViolation`] with every line item
    ///   that exceeds its cap.
    pub fn resolve(
        &self,
        request: &TaxRequest,
    ) -> Result<TaxResult, ValidationError> {
        Self::check_inputs(request)?;

        let gross = request.gross_income;
        let source = IncomeSource::classify(request.category, request.subtype)?;

        let limits = DeductionLimitValidator;
        limits
            .validate(gross, &request.deductions)
            .map_err(ValidationError::DeductionLimitViolation)?;

        let expense_deduction = ExpenseDeductionResolver::new(&self.config.expenses).resolve(
            gross,
            source,
            request.expense_method,
        );
        let total_deductions = limits.capped_total(gross, &request.deductions);
        let taxable_income = non_negative(
            gross
                .saturating_sub(expense_deduction)
                .saturating_sub(total_deductions),
        );

        let progressive_tax =
            ProgressiveTaxCalculator::new(&self.config.brackets).calculate(taxable_income);

        let minimum = AlternativeMinimumCalculator::new(&self.config.minimum_tax);
        let minimum_tax = minimum.minimum_for(source.category(), gross);
        let (tax_amount, method) = minimum.resolve(progressive_tax, minimum_tax);

        let effective_rate = if gross > Decimal::ZERO {
            tax_amount / gross
        } else {
            Decimal::ZERO
        };

        debug!(
            tax_year = self.config.tax_year,
            category = %source.category(),
            expense_deduction = %expense_deduction,
            total_deductions = %total_deductions,
            taxable_income = %taxable_income,
            progressive_tax = %progressive_tax,
            minimum_tax = %minimum_tax,
            method = ?method,
            "resolved tax liability"
        );

        Ok(TaxResult {
            gross_income: gross,
            expense_deduction,
            total_deductions,
            taxable_income,
            progressive_tax,
            minimum_tax,
            tax_amount,
            effective_rate,
            method,
        })
    }

    fn check_inputs(request: &TaxRequest) -> Result<(), ValidationError> {
        if request.gross_income < Decimal::ZERO {
            return Err(ValidationError::invalid_input("gross_income", request.gross_income));
        }
        if let ExpenseMethod::Actual(amount) = request.expense_method
            && amount < Decimal::ZERO
        {
            return Err(ValidationError::invalid_input("actual_expenses", amount));
        }
        for item in &request.deductions {
            if item.declared_amount < Decimal::ZERO || item.checked_recorded_amount().is_none() {
                return Err(ValidationError::invalid_input(
                    format!("deductions.{}", item.name),
                    item.declared_amount,
                ));
            }
        }
        Ok(())
    }
}
