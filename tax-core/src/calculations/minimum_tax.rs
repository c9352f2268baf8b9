//! Flat minimum tax on gross income.
//!
//! For categories in the minimum-tax set the final liability is the larger
//! of the progressive tax and a flat share of gross income, unless the flat
//! amount is at or below the de-minimis threshold.

use rust_decimal::Decimal;

use crate::calculations::common::whole_units;
use crate::models::{IncomeCategory, MinimumTaxRules, TaxMethod};

#[derive(Debug, Clone, Copy)]
pub struct AlternativeMinimumCalculator<'a> {
    rules: &'a MinimumTaxRules,
}

impl<'a> AlternativeMinimumCalculator<'a> {
    pub fn new(rules: &'a MinimumTaxRules) -> Self {
        Self { rules }
    }

    pub fn applies_to(
        &self,
        category: IncomeCategory,
    ) -> bool {
        self.rules.applies_to(category)
    }

    /// `floor(gross_income × rate)`, zero for non-positive income.
    pub fn calculate(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        whole_units(gross_income.saturating_mul(self.rules.rate))
    }

    /// Minimum tax for `category`, or zero when the category is exempt.
    pub fn minimum_for(
        &self,
        category: IncomeCategory,
        gross_income: Decimal,
    ) -> Decimal {
        if self.applies_to(category) {
            self.calculate(gross_income)
        } else {
            Decimal::ZERO
        }
    }

    /// Picks the final liability from the two candidate amounts.
    ///
    /// The minimum tax only wins when it is positive, strictly above the
    /// de-minimis threshold and strictly above the progressive tax. Ties go
    /// to the progressive method.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::AlternativeMinimumCalculator;
    /// use tax_core::{TaxMethod, TaxYearConfig};
    ///
    /// let config = TaxYearConfig::year_2025();
    /// let calculator = AlternativeMinimumCalculator::new(&config.minimum_tax);
    ///
    /// // 5,000 is not above the threshold
    /// assert_eq!(calculator.resolve(dec!(0), dec!(5000)), (dec!(0), TaxMethod::Progressive));
    /// assert_eq!(calculator.resolve(dec!(0), dec!(5001)), (dec!(5001), TaxMethod::Minimum));
    /// ```
    pub fn resolve(
        &self,
        progressive_tax: Decimal,
        minimum_tax: Decimal,
    ) -> (Decimal, TaxMethod) {
        let counts = minimum_tax > Decimal::ZERO && minimum_tax > self.rules.de_minimis;

        if counts && minimum_tax > progressive_tax {
            (minimum_tax, TaxMethod::Minimum)
        } else {
            (progressive_tax, TaxMethod::Progressive)
        }
    }
}
