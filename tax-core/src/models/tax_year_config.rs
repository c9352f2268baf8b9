use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{
    BracketTable, BusinessSubtype, DeductionCap, DeductionKind, DeductionLineItem, DeductionRule,
    IncomeCategory, ProfessionSubtype, TaxBracket,
};

/// A percentage of gross income limited to an absolute amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedRate {
    pub rate: Decimal,
    pub cap: Decimal,
}

/// Two-tier rate with an absolute ceiling on the combined deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredRate {
    /// Income up to this amount takes `lower_rate`.
    pub threshold: Decimal,
    pub lower_rate: Decimal,
    /// Rate on income above `threshold`.
    pub upper_rate: Decimal,
    pub ceiling: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionRate {
    pub subtype: ProfessionSubtype,
    pub rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRate {
    pub subtype: BusinessSubtype,
    pub rate: Decimal,
}

/// Expense deduction rules per income category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRules {
    pub wages: CappedRate,
    pub royalties: CappedRate,
    pub rental_rate: Decimal,
    pub contracting_rate: Decimal,
    pub profession_default_rate: Decimal,
    #[serde(default)]
    pub profession_rates: Vec<ProfessionRate>,
    pub business_default_rate: Decimal,
    #[serde(default)]
    pub business_rates: Vec<BusinessRate>,
    pub entertainment: TieredRate,
}

impl ExpenseRules {
    pub fn profession_rate(
        &self,
        subtype: ProfessionSubtype,
    ) -> Decimal {
        self.profession_rates
            .iter()
            .find(|r| r.subtype == subtype)
            .map_or(self.profession_default_rate, |r| r.rate)
    }

    pub fn business_rate(
        &self,
        subtype: BusinessSubtype,
    ) -> Decimal {
        self.business_rates
            .iter()
            .find(|r| r.subtype == subtype)
            .map_or(self.business_default_rate, |r| r.rate)
    }
}

/// Flat minimum tax on gross income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumTaxRules {
    pub rate: Decimal,
    /// Minimum tax at or below this amount is disregarded.
    pub de_minimis: Decimal,
    /// Categories compared against the minimum tax. `None` uses
    /// [`IncomeCategory::subject_to_minimum_tax`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<IncomeCategory>>,
}

impl MinimumTaxRules {
    pub fn applies_to(
        &self,
        category: IncomeCategory,
    ) -> bool {
        match &self.categories {
            Some(categories) => categories.contains(&category),
            None => category.subject_to_minimum_tax(),
        }
    }
}

/// Suggested investment amounts for incomes below `gross_below`.
/// The last tier has no upper limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_below: Option<Decimal>,
    pub investments: Vec<Decimal>,
}

/// Everything that changes from one tax year to the next.
///
/// A config is built once and passed to the calculators; nothing in it is
/// mutated afterwards, so several years can be held side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub brackets: BracketTable,
    pub expenses: ExpenseRules,
    pub minimum_tax: MinimumTaxRules,
    #[serde(default)]
    pub deduction_rules: Vec<DeductionRule>,
    #[serde(default)]
    pub planning_tiers: Vec<PlanningTier>,
}

impl TaxYearConfig {
    /// Schedule, expense rules and deduction caps for tax year 2025.
    pub fn year_2025() -> Self {
        Self {
            tax_year: 2025,
            brackets: BracketTable::from_builtin(&BRACKETS_2025),
            expenses: ExpenseRules {
                wages: CappedRate {
                    rate: dec!(0.50),
                    cap: dec!(100000),
                },
                royalties: CappedRate {
                    rate: dec!(0.50),
                    cap: dec!(100000),
                },
                rental_rate: dec!(0.30),
                contracting_rate: dec!(0.60),
                profession_default_rate: dec!(0.30),
                profession_rates: vec![
                    ProfessionRate {
                        subtype: ProfessionSubtype::Medical,
                        rate: dec!(0.60),
                    },
                    ProfessionRate {
                        subtype: ProfessionSubtype::Dentistry,
                        rate: dec!(0.60),
                    },
                ],
                business_default_rate: dec!(0.60),
                business_rates: Vec::new(),
                entertainment: TieredRate {
                    threshold: dec!(300000),
                    lower_rate: dec!(0.60),
                    upper_rate: dec!(0.40),
                    ceiling: dec!(600000),
                },
            },
            minimum_tax: MinimumTaxRules {
                rate: dec!(0.005),
                de_minimis: dec!(5000),
                categories: None,
            },
            deduction_rules: deduction_rules_2025(),
            planning_tiers: planning_tiers_2025(),
        }
    }

    pub fn with_brackets(
        mut self,
        brackets: BracketTable,
    ) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn deduction_rule(
        &self,
        kind: DeductionKind,
    ) -> Option<&DeductionRule> {
        self.deduction_rules.iter().find(|r| r.kind == kind)
    }

    /// Builds a capped line item for a catalogue deduction.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownDeduction`] if this year has no rule
    /// for `kind`.
    pub fn line_item(
        &self,
        kind: DeductionKind,
        declared_amount: Decimal,
    ) -> Result<DeductionLineItem, ValidationError> {
        self.deduction_rule(kind)
            .map(|rule| rule.line_item(declared_amount))
            .ok_or(ValidationError::UnknownDeduction {
                kind,
                tax_year: self.tax_year,
            })
    }
}

const BRACKETS_2025: [TaxBracket; 8] = [
    TaxBracket::bounded(dec!(150000), dec!(0)),
    TaxBracket::bounded(dec!(300000), dec!(0.05)),
    TaxBracket::bounded(dec!(500000), dec!(0.10)),
    TaxBracket::bounded(dec!(750000), dec!(0.15)),
    TaxBracket::bounded(dec!(1000000), dec!(0.20)),
    TaxBracket::bounded(dec!(2000000), dec!(0.25)),
    TaxBracket::bounded(dec!(5000000), dec!(0.30)),
    TaxBracket::unbounded(dec!(0.35)),
];

fn deduction_rules_2025() -> Vec<DeductionRule> {
    use DeductionCap::{Fixed, MinOf, PercentOfIncome, Uncapped};
    use DeductionKind::*;

    let min_of = |fixed, percent| MinOf { fixed, percent };

    let mut rules = vec![
        DeductionRule::new(PersonalAllowance, Fixed(dec!(60000))),
        DeductionRule::new(SpouseAllowance, Fixed(dec!(60000))),
        // Per-head allowances: 30,000 a child, 60,000 a disabled dependant
        DeductionRule::new(ChildAllowance, Uncapped),
        DeductionRule::new(ParentSupport, Fixed(dec!(240000))),
        DeductionRule::new(DisabledSupport, Uncapped),
        DeductionRule::new(LifeInsurance, Fixed(dec!(100000))),
        DeductionRule::new(LifeInsurancePension, Fixed(dec!(10000))),
        DeductionRule::new(ParentLifeInsurance, Fixed(dec!(60000))),
        DeductionRule::new(HealthInsurance, Fixed(dec!(25000))),
        DeductionRule::new(ParentHealthInsurance, Fixed(dec!(60000))),
        DeductionRule::new(SocialSecurity, Fixed(dec!(9000))),
        DeductionRule::new(PensionInsurance, min_of(dec!(200000), dec!(0.15))),
        DeductionRule::new(ProvidentFund, min_of(dec!(500000), dec!(0.15))),
        DeductionRule::new(GovernmentPensionFund, Fixed(dec!(500000))),
        DeductionRule::new(PrivateTeacherFund, Fixed(dec!(500000))),
        DeductionRule::new(RetirementMutualFund, min_of(dec!(500000), dec!(0.30))),
        DeductionRule::new(ThaiEsg, Fixed(dec!(300000))),
        DeductionRule::new(ThaiEsgxNew, Fixed(dec!(300000))),
        DeductionRule::new(ThaiEsgxLtf, Fixed(dec!(300000))),
        DeductionRule::new(StockInvestment, Fixed(dec!(100000))),
        DeductionRule::new(EasyEReceipt, Fixed(dec!(50000))),
        DeductionRule::new(HomeLoanInterest, Fixed(dec!(100000))),
        DeductionRule::new(NationalSavingsFund, Fixed(dec!(30000))),
        DeductionRule::new(DonationGeneral, PercentOfIncome(dec!(0.10))),
        DeductionRule::new(DonationEducation, PercentOfIncome(dec!(0.10))),
        DeductionRule::new(DonationSocialEnterprise, Fixed(dec!(100000))),
        DeductionRule::new(DonationPolitical, Fixed(dec!(10000))),
    ];

    // Education donations are recorded at twice the amount given.
    if let Some(rule) = rules.iter_mut().find(|r| r.kind == DonationEducation) {
        rule.multiplier = dec!(2);
    }

    rules
}

fn planning_tiers_2025() -> Vec<PlanningTier> {
    let tier = |gross_below: Option<Decimal>, investments: [Decimal; 3]| PlanningTier {
        gross_below,
        investments: investments.to_vec(),
    };

    vec![
        tier(Some(dec!(600000)), [dec!(40000), dec!(60000), dec!(80000)]),
        tier(Some(dec!(1000000)), [dec!(60000), dec!(100000), dec!(150000)]),
        tier(Some(dec!(1500000)), [dec!(200000), dec!(350000), dec!(500000)]),
        tier(Some(dec!(2000000)), [dec!(300000), dec!(500000), dec!(800000)]),
        tier(Some(dec!(3000000)), [dec!(500000), dec!(800000), dec!(1200000)]),
        tier(None, [dec!(800000), dec!(1200000), dec!(1800000)]),
    ]
}
