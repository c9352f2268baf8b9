use rust_decimal::Decimal;

use crate::calculations::{
    Allocation, DeductionLimitValidator, DifferentialTaxSavingCalculator, MarginalRateLookup,
    PlanTier, SavingBreakdown, SavingPlanner, TaxLiabilityResolver,
};
use crate::error::ValidationError;
use crate::models::{DeductionKind, DeductionLineItem, TaxRequest, TaxResult, TaxYearConfig};

/// Entry point for one tax year.
///
/// Owns its [`TaxYearConfig`] and hands borrowed views of it to the
/// calculators on every call. Cloning or sharing an engine behind an `Arc`
/// is safe; nothing is mutated after construction.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{DeductionKind, IncomeCategory, TaxEngine, TaxRequest};
///
/// let engine = TaxEngine::default();
/// let request = TaxRequest::new(dec!(600000), IncomeCategory::Wages)
///     .with_deduction(engine.line_item(DeductionKind::PersonalAllowance, dec!(60000))?);
///
/// let result = engine.compute_tax(&request)?;
/// assert_eq!(result.tax_amount, dec!(21500));
///
/// // 40,000 more in deductions keeps the base inside the 10% bracket
/// assert_eq!(engine.compute_saving(result.taxable_income, dec!(40000)), dec!(4000));
/// # Ok::<(), tax_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxEngine {
    config: TaxYearConfig,
}

impl TaxEngine {
    pub fn new(config: TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    pub fn tax_year(&self) -> i32 {
        self.config.tax_year
    }

    /// Resolves the liability for `request`. See [`TaxLiabilityResolver::resolve`].
    pub fn compute_tax(
        &self,
        request: &TaxRequest,
    ) -> Result<TaxResult, ValidationError> {
        TaxLiabilityResolver::new(&self.config).resolve(request)
    }

    /// Tax saved by reducing `taxable_base` by `hypothetical_deduction`.
    pub fn compute_saving(
        &self,
        taxable_base: Decimal,
        hypothetical_deduction: Decimal,
    ) -> Decimal {
        self.saving_calculator()
            .saving(taxable_base, hypothetical_deduction)
    }

    pub fn saving_breakdown(
        &self,
        taxable_base: Decimal,
        hypothetical_deduction: Decimal,
    ) -> SavingBreakdown {
        self.saving_calculator()
            .breakdown(taxable_base, hypothetical_deduction)
    }

    /// Bracket rate at `taxable_income`, for display only.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        MarginalRateLookup::new(&self.config.brackets).rate_at(taxable_income)
    }

    pub fn plan_savings(
        &self,
        result: &TaxResult,
    ) -> Vec<PlanTier> {
        SavingPlanner::new(&self.config).plan(result)
    }

    pub fn distribute(
        &self,
        tier: &PlanTier,
        percentages: &[Decimal],
    ) -> Result<Vec<Allocation>, ValidationError> {
        SavingPlanner::new(&self.config).distribute(tier.investment, tier.tax_saving, percentages)
    }

    /// Builds a catalogue line item under this year's cap rules.
    pub fn line_item(
        &self,
        kind: DeductionKind,
        declared_amount: Decimal,
    ) -> Result<DeductionLineItem, ValidationError> {
        self.config.line_item(kind, declared_amount)
    }

    /// Remaining allowance for `item` at `gross_income`.
    pub fn deduction_headroom(
        &self,
        gross_income: Decimal,
        item: &DeductionLineItem,
    ) -> Decimal {
        DeductionLimitValidator.headroom(gross_income, item)
    }

    fn saving_calculator(&self) -> DifferentialTaxSavingCalculator<'_> {
        DifferentialTaxSavingCalculator::new(&self.config.brackets)
    }
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::new(TaxYearConfig::year_2025())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{BracketTable, IncomeCategory, TaxBracket};

    fn scenario(engine: &TaxEngine) -> TaxResult {
        let request = TaxRequest::new(dec!(600000), IncomeCategory::Wages).with_deduction(
            engine
                .line_item(DeductionKind::PersonalAllowance, dec!(60000))
                .unwrap(),
        );
        engine.compute_tax(&request).unwrap()
    }

    #[test]
    fn default_engine_is_tax_year_2025() {
        assert_eq!(TaxEngine::default().tax_year(), 2025);
    }

    #[test]
    fn scenario_plans_and_distributes() {
        let engine = TaxEngine::default();
        let result = scenario(&engine);

        let plan = engine.plan_savings(&result);
        let allocations = engine
            .distribute(&plan[2], &[dec!(50), dec!(50)])
            .unwrap();

        assert_eq!(plan[2].tax_saving, dec!(14500));
        assert_eq!(allocations[0].investment, dec!(75000));
        assert_eq!(allocations[0].tax_saving, dec!(7250));
    }

    #[test]
    fn marginal_rate_is_display_only() {
        let engine = TaxEngine::default();

        assert_eq!(engine.marginal_rate(dec!(320000)), dec!(0.10));
        assert_eq!(engine.compute_saving(dec!(320000), dec!(40000)), dec!(3000));
        assert_eq!(engine.saving_breakdown(dec!(320000), dec!(40000)).tax_after, dec!(6500));
    }

    #[test]
    fn deduction_headroom_uses_year_caps() {
        let engine = TaxEngine::default();
        let item = engine
            .line_item(DeductionKind::LifeInsurance, dec!(30000))
            .unwrap();

        assert_eq!(engine.deduction_headroom(dec!(600000), &item), dec!(70000));
    }

    #[test]
    fn injected_schedule_changes_result() {
        let flat = BracketTable::new(vec![TaxBracket::unbounded(dec!(0.10))]).unwrap();
        let engine = TaxEngine::new(TaxYearConfig::year_2025().with_brackets(flat));

        let result = scenario(&engine);

        assert_eq!(result.tax_amount, dec!(44000));
    }
}
