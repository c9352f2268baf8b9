//! Progressive schedule calculations.
//!
//! [`ProgressiveTaxCalculator`] computes the tax owed on a taxable income;
//! [`MarginalRateLookup`] answers "which bracket am I in" for callers that
//! explain next-bracket effects. Savings are never derived from the marginal
//! rate, see [`crate::calculations::DifferentialTaxSavingCalculator`].

use rust_decimal::Decimal;

use crate::models::BracketTable;

/// Tax owed under the bracket schedule.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTaxCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Tax on `taxable_income` in whole currency units. Zero for non-positive income.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.table.tax_for(taxable_income)
    }
}

/// Bracket rate lookup for explanatory output.
#[derive(Debug, Clone, Copy)]
pub struct MarginalRateLookup<'a> {
    table: &'a BracketTable,
}

impl<'a> MarginalRateLookup<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Rate applied to the last unit of `taxable_income`.
    pub fn rate_at(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.table.rate_at(taxable_income)
    }

    /// Upper bound of the bracket containing `taxable_income`, or `None` in
    /// the unbounded bracket.
    pub fn bracket_ceiling(
        &self,
        taxable_income: Decimal,
    ) -> Option<Decimal> {
        self.table
            .boundaries()
            .find(|upper| taxable_income <= *upper)
    }

    /// Distance from `taxable_income` down to the start of its bracket.
    ///
    /// A deduction no larger than this stays within the current bracket and
    /// is worth exactly `amount × rate_at(taxable_income)`.
    pub fn room_above_floor(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let floor = self
            .table
            .boundaries()
            .take_while(|upper| *upper < taxable_income)
            .last()
            .unwrap_or(Decimal::ZERO);

        taxable_income - floor
    }
}
