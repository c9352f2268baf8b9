//! Expense deduction by income category.
//!
//! | Category | Standard deduction |
//! |----------|--------------------|
//! | Wages, royalties | rate of gross, capped |
//! | Fees/commissions, interest/dividends | none |
//! | Rental | flat rate |
//! | Independent profession | subtype rate, uncapped |
//! | Contracting | flat rate |
//! | Other business | subtype rate; entertainment is two-tier with a ceiling |
//!
//! Every rate and cap comes from [`ExpenseRules`]; this module only decides
//! which rule applies.

use rust_decimal::Decimal;

use crate::calculations::common::{non_negative, whole_units};
use crate::models::{
    BusinessSubtype, CappedRate, ExpenseMethod, ExpenseRules, IncomeSource, TieredRate,
};

/// Resolves the expense deduction for an income source.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::ExpenseDeductionResolver;
/// use tax_core::{BusinessSubtype, ExpenseMethod, IncomeSource, TaxYearConfig};
///
/// let config = TaxYearConfig::year_2025();
/// let resolver = ExpenseDeductionResolver::new(&config.expenses);
///
/// let wages = resolver.resolve(dec!(600000), IncomeSource::Wages, ExpenseMethod::Standard);
/// assert_eq!(wages, dec!(100000));
///
/// // 60% of the first 300,000 plus 40% of the remaining 300,000
/// let entertainer = IncomeSource::OtherBusiness(BusinessSubtype::Entertainment);
/// assert_eq!(resolver.resolve(dec!(600000), entertainer, ExpenseMethod::Standard), dec!(300000));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExpenseDeductionResolver<'a> {
    rules: &'a ExpenseRules,
}

impl<'a> ExpenseDeductionResolver<'a> {
    pub fn new(rules: &'a ExpenseRules) -> Self {
        Self { rules }
    }

    /// Expense deduction for `gross_income`.
    ///
    /// With [`ExpenseMethod::Actual`] the declared amount is returned
    /// unchanged; checking it against income is the caller's concern.
    pub fn resolve(
        &self,
        gross_income: Decimal,
        source: IncomeSource,
        method: ExpenseMethod,
    ) -> Decimal {
        match method {
            ExpenseMethod::Actual(amount) => amount,
            ExpenseMethod::Standard => self.standard(non_negative(gross_income), source),
        }
    }

    fn standard(
        &self,
        gross: Decimal,
        source: IncomeSource,
    ) -> Decimal {
        match source {
            IncomeSource::Wages => capped(gross, self.rules.wages),
            IncomeSource::Royalties => capped(gross, self.rules.royalties),
            IncomeSource::FeesCommissions | IncomeSource::InterestDividends => Decimal::ZERO,
            IncomeSource::Rental => flat(gross, self.rules.rental_rate),
            IncomeSource::IndependentProfession(subtype) => {
                flat(gross, self.rules.profession_rate(subtype))
            }
            IncomeSource::Contracting => flat(gross, self.rules.contracting_rate),
            IncomeSource::OtherBusiness(BusinessSubtype::Entertainment) => {
                tiered(gross, self.rules.entertainment)
            }
            IncomeSource::OtherBusiness(subtype) => flat(gross, self.rules.business_rate(subtype)),
        }
    }
}

fn flat(
    gross: Decimal,
    rate: Decimal,
) -> Decimal {
    whole_units(gross.saturating_mul(rate))
}

fn capped(
    gross: Decimal,
    rule: CappedRate,
) -> Decimal {
    flat(gross, rule.rate).min(rule.cap)
}

fn tiered(
    gross: Decimal,
    rule: TieredRate,
) -> Decimal {
    let lower = gross.min(rule.threshold).saturating_mul(rule.lower_rate);
    let upper = non_negative(gross.saturating_sub(rule.threshold)).saturating_mul(rule.upper_rate);

    whole_units(lower.saturating_add(upper)).min(rule.ceiling)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ProfessionSubtype, TaxYearConfig};

    fn standard(
        gross: Decimal,
        source: IncomeSource,
    ) -> Decimal {
        let config = TaxYearConfig::year_2025();
        ExpenseDeductionResolver::new(&config.expenses).resolve(gross, source, ExpenseMethod::Standard)
    }

    fn entertainment(gross: Decimal) -> Decimal {
        standard(gross, IncomeSource::OtherBusiness(BusinessSubtype::Entertainment))
    }

    // =========================================================================
    // wages and royalties
    // =========================================================================

    #[test]
    fn wages_take_half_below_cap() {
        assert_eq!(standard(dec!(150000), IncomeSource::Wages), dec!(75000));
    }

    #[test]
    fn wages_are_capped() {
        assert_eq!(standard(dec!(600000), IncomeSource::Wages), dec!(100000));
        assert_eq!(standard(dec!(200000), IncomeSource::Wages), dec!(100000));
    }

    #[test]
    fn royalties_follow_capped_rule() {
        assert_eq!(standard(dec!(80000), IncomeSource::Royalties), dec!(40000));
        assert_eq!(standard(dec!(900000), IncomeSource::Royalties), dec!(100000));
    }

    // =========================================================================
    // categories without a deduction
    // =========================================================================

    #[test]
    fn fees_and_interest_have_no_expense_deduction() {
        assert_eq!(standard(dec!(500000), IncomeSource::FeesCommissions), dec!(0));
        assert_eq!(standard(dec!(500000), IncomeSource::InterestDividends), dec!(0));
    }

    // =========================================================================
    // flat-rate categories
    // =========================================================================

    #[test]
    fn rental_is_flat_thirty_percent() {
        assert_eq!(standard(dec!(240000), IncomeSource::Rental), dec!(72000));
    }

    #[test]
    fn contracting_is_flat_sixty_percent_uncapped() {
        assert_eq!(standard(dec!(10000000), IncomeSource::Contracting), dec!(6000000));
    }

    #[test]
    fn profession_rate_depends_on_subtype() {
        let doctor = IncomeSource::IndependentProfession(ProfessionSubtype::Medical);
        let lawyer = IncomeSource::IndependentProfession(ProfessionSubtype::Law);
        let other = IncomeSource::IndependentProfession(ProfessionSubtype::Other);

        assert_eq!(standard(dec!(960000), doctor), dec!(576000));
        assert_eq!(standard(dec!(960000), lawyer), dec!(288000));
        assert_eq!(standard(dec!(960000), other), dec!(288000));
    }

    #[test]
    fn ordinary_business_takes_default_rate() {
        let salon = IncomeSource::OtherBusiness(BusinessSubtype::HairSalon);

        assert_eq!(standard(dec!(540000), salon), dec!(324000));
    }

    #[test]
    fn flat_rate_floors_fractional_amounts() {
        assert_eq!(standard(dec!(1001), IncomeSource::Rental), dec!(300));
    }

    // =========================================================================
    // entertainment tiering
    // =========================================================================

    #[test]
    fn entertainment_below_threshold_uses_lower_rate() {
        assert_eq!(entertainment(dec!(200000)), dec!(120000));
    }

    #[test]
    fn entertainment_at_threshold() {
        assert_eq!(entertainment(dec!(300000)), dec!(180000));
    }

    #[test]
    fn entertainment_above_threshold_blends_rates() {
        // 180,000 + 40% of 300,000
        assert_eq!(entertainment(dec!(600000)), dec!(300000));
        // 180,000 + 40% of 700,000
        assert_eq!(entertainment(dec!(1000000)), dec!(460000));
    }

    #[test]
    fn entertainment_reaches_ceiling_exactly() {
        // 180,000 + 40% of 1,050,000 = 600,000
        assert_eq!(entertainment(dec!(1350000)), dec!(600000));
    }

    #[test]
    fn entertainment_never_exceeds_ceiling() {
        assert_eq!(entertainment(dec!(1350001)), dec!(600000));
        assert_eq!(entertainment(dec!(5000000)), dec!(600000));
    }

    #[test]
    fn entertainment_just_below_ceiling() {
        // 180,000 + 40% of 1,049,990 = 599,996
        assert_eq!(entertainment(dec!(1349990)), dec!(599996));
    }

    // =========================================================================
    // actual expenses
    // =========================================================================

    #[test]
    fn actual_method_returns_declared_amount() {
        let config = TaxYearConfig::year_2025();
        let resolver = ExpenseDeductionResolver::new(&config.expenses);

        let result = resolver.resolve(
            dec!(100000),
            IncomeSource::Wages,
            ExpenseMethod::Actual(dec!(250000)),
        );

        assert_eq!(result, dec!(250000));
    }

    #[test]
    fn zero_income_has_zero_standard_deduction() {
        assert_eq!(standard(dec!(0), IncomeSource::Contracting), dec!(0));
        assert_eq!(entertainment(dec!(0)), dec!(0));
    }
}
