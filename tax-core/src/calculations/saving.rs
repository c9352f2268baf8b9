//! Tax saved by a hypothetical extra deduction.
//!
//! The saving is always the difference between two full schedule
//! evaluations. Multiplying the deduction by the marginal rate at the base
//! is wrong whenever the deduction pulls income across a bracket boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::ProgressiveTaxCalculator;
use crate::calculations::common::non_negative;
use crate::models::BracketTable;

/// Before/after view of a hypothetical deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingBreakdown {
    pub tax_before: Decimal,
    pub tax_after: Decimal,
    /// Portion of the hypothetical deduction that actually reduced taxable income.
    pub effective_deduction: Decimal,
    pub saving: Decimal,
    /// `saving / effective_deduction`, zero when nothing was deducted.
    pub blended_rate: Decimal,
}

/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::DifferentialTaxSavingCalculator;
/// use tax_core::TaxYearConfig;
///
/// let config = TaxYearConfig::year_2025();
/// let calculator = DifferentialTaxSavingCalculator::new(&config.brackets);
///
/// // 20,000 at 10% then 20,000 at 5%, not 40,000 at 10%
/// assert_eq!(calculator.saving(dec!(320000), dec!(40000)), dec!(3000));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DifferentialTaxSavingCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> DifferentialTaxSavingCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// `tax(base) - tax(base - effective)`, where the effective deduction is
    /// the hypothetical amount limited to `[0, base]`.
    pub fn saving(
        &self,
        taxable_base: Decimal,
        hypothetical_deduction: Decimal,
    ) -> Decimal {
        self.breakdown(taxable_base, hypothetical_deduction).saving
    }

    pub fn breakdown(
        &self,
        taxable_base: Decimal,
        hypothetical_deduction: Decimal,
    ) -> SavingBreakdown {
        let base = non_negative(taxable_base);
        let effective_deduction = non_negative(hypothetical_deduction).min(base);
        let calculator = ProgressiveTaxCalculator::new(self.table);

        let tax_before = calculator.calculate(base);
        let tax_after = calculator.calculate(base - effective_deduction);
        let saving = tax_before - tax_after;

        let blended_rate = if effective_deduction > Decimal::ZERO {
            saving / effective_deduction
        } else {
            Decimal::ZERO
        };

        SavingBreakdown {
            tax_before,
            tax_after,
            effective_deduction,
            saving,
            blended_rate,
        }
    }
}
