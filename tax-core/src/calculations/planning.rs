//! Investment saving plans.
//!
//! A tax year lists suggested investment totals by gross income band. Each
//! total is priced with the differential saving calculator against the
//! taxable income of an already-resolved [`TaxResult`], and can then be
//! split across allocations by percentage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::DifferentialTaxSavingCalculator;
use crate::calculations::common::whole_units;
use crate::error::ValidationError;
use crate::models::{TaxResult, TaxYearConfig};

/// One suggested investment total and the tax it saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTier {
    pub investment: Decimal,
    pub tax_saving: Decimal,
}

/// A percentage share of a plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub percentage: Decimal,
    pub investment: Decimal,
    pub tax_saving: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct SavingPlanner<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> SavingPlanner<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Investment totals for the first band whose limit exceeds
    /// `gross_income`. Empty when the tax year defines no bands.
    pub fn tiers_for(
        &self,
        gross_income: Decimal,
    ) -> &'a [Decimal] {
        self.config
            .planning_tiers
            .iter()
            .find(|tier| tier.gross_below.is_none_or(|limit| gross_income < limit))
            .map(|tier| tier.investments.as_slice())
            .unwrap_or_default()
    }

    /// Prices every tier for `result`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::{SavingPlanner, TaxLiabilityResolver};
    /// use tax_core::{DeductionKind, IncomeCategory, TaxRequest, TaxYearConfig};
    ///
    /// let config = TaxYearConfig::year_2025();
    /// let allowance = config.line_item(DeductionKind::PersonalAllowance, dec!(60000)).unwrap();
    /// let request = TaxRequest::new(dec!(600000), IncomeCategory::Wages).with_deduction(allowance);
    /// let result = TaxLiabilityResolver::new(&config).resolve(&request).unwrap();
    ///
    /// let savings: Vec<_> = SavingPlanner::new(&config)
    ///     .plan(&result)
    ///     .iter()
    ///     .map(|tier| tier.tax_saving)
    ///     .collect();
    ///
    /// assert_eq!(savings, vec![dec!(6000), dec!(10000), dec!(14500)]);
    /// ```
    pub fn plan(
        &self,
        result: &TaxResult,
    ) -> Vec<PlanTier> {
        let calculator = DifferentialTaxSavingCalculator::new(&self.config.brackets);

        self.tiers_for(result.gross_income)
            .iter()
            .map(|&investment| PlanTier {
                investment,
                tax_saving: calculator.saving(result.taxable_income, investment),
            })
            .collect()
    }

    /// Splits `investment` and `tax_saving` by `percentages` (0 to 100).
    ///
    /// Each share is floored independently, so the parts may sum to slightly
    /// less than the totals.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidInput`] for a negative percentage.
    pub fn distribute(
        &self,
        investment: Decimal,
        tax_saving: Decimal,
        percentages: &[Decimal],
    ) -> Result<Vec<Allocation>, ValidationError> {
        percentages
            .iter()
            .enumerate()
            .map(|(index, &percentage)| {
                if percentage < Decimal::ZERO {
                    return Err(ValidationError::invalid_input(
                        format!("allocations[{index}].percentage"),
                        percentage,
                    ));
                }
                let share = percentage / Decimal::ONE_HUNDRED;

                Ok(Allocation {
                    percentage,
                    investment: whole_units(share.saturating_mul(investment)),
                    tax_saving: whole_units(share.saturating_mul(tax_saving)),
                })
            })
            .collect()
    }
}
