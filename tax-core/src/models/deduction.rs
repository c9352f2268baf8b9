use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statutory ceiling for a named deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCap {
    /// Absolute amount.
    Fixed(Decimal),
    /// Fraction of gross income.
    PercentOfIncome(Decimal),
    /// The lesser of an absolute amount and a fraction of gross income.
    MinOf { fixed: Decimal, percent: Decimal },
    /// No statutory ceiling. Per-head allowances with no limit on the number
    /// of dependants are claimed this way.
    Uncapped,
}

impl DeductionCap {
    /// Largest amount the cap allows for `gross_income`.
    ///
    /// Percentage limits are floored to whole currency units. An uncapped
    /// deduction reports [`Decimal::MAX`].
    pub fn legal_max(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        let share = |percent: Decimal| {
            gross_income
                .max(Decimal::ZERO)
                .saturating_mul(percent)
                .floor()
        };

        match *self {
            Self::Fixed(amount) => amount,
            Self::PercentOfIncome(percent) => share(percent),
            Self::MinOf { fixed, percent } => fixed.min(share(percent)),
            Self::Uncapped => Decimal::MAX,
        }
    }
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

fn is_unit_multiplier(m: &Decimal) -> bool {
    *m == Decimal::ONE
}

/// A personal deduction claimed on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLineItem {
    pub name: String,
    pub declared_amount: Decimal,
    pub cap: DeductionCap,
    /// Factor applied to the declared amount before capping. Education
    /// donations count double.
    #[serde(default = "default_multiplier", skip_serializing_if = "is_unit_multiplier")]
    pub multiplier: Decimal,
}

impl DeductionLineItem {
    pub fn new(
        name: impl Into<String>,
        declared_amount: Decimal,
        cap: DeductionCap,
    ) -> Self {
        Self {
            name: name.into(),
            declared_amount,
            cap,
            multiplier: Decimal::ONE,
        }
    }

    pub fn with_multiplier(
        mut self,
        multiplier: Decimal,
    ) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// The amount the item counts for before its cap is checked, or `None`
    /// if applying the multiplier overflows.
    pub fn checked_recorded_amount(&self) -> Option<Decimal> {
        self.declared_amount.checked_mul(self.multiplier)
    }

    /// Like [`Self::checked_recorded_amount`], saturating on overflow.
    pub fn recorded_amount(&self) -> Decimal {
        self.declared_amount.saturating_mul(self.multiplier)
    }
}

/// A line item whose recorded amount exceeds its legal maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub name: String,
    /// Recorded amount (declared amount times the item's multiplier).
    pub declared: Decimal,
    pub legal_max: Decimal,
    pub excess: Decimal,
}

/// Deductions known to the built-in cap catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    PersonalAllowance,
    SpouseAllowance,
    ChildAllowance,
    ParentSupport,
    DisabledSupport,
    LifeInsurance,
    LifeInsurancePension,
    ParentLifeInsurance,
    HealthInsurance,
    ParentHealthInsurance,
    SocialSecurity,
    PensionInsurance,
    ProvidentFund,
    GovernmentPensionFund,
    PrivateTeacherFund,
    RetirementMutualFund,
    ThaiEsg,
    ThaiEsgxNew,
    ThaiEsgxLtf,
    StockInvestment,
    EasyEReceipt,
    HomeLoanInterest,
    NationalSavingsFund,
    DonationGeneral,
    DonationEducation,
    DonationSocialEnterprise,
    DonationPolitical,
}

impl DeductionKind {
    pub const ALL: [Self; 27] = [
        Self::PersonalAllowance,
        Self::SpouseAllowance,
        Self::ChildAllowance,
        Self::ParentSupport,
        Self::DisabledSupport,
        Self::LifeInsurance,
        Self::LifeInsurancePension,
        Self::ParentLifeInsurance,
        Self::HealthInsurance,
        Self::ParentHealthInsurance,
        Self::SocialSecurity,
        Self::PensionInsurance,
        Self::ProvidentFund,
        Self::GovernmentPensionFund,
        Self::PrivateTeacherFund,
        Self::RetirementMutualFund,
        Self::ThaiEsg,
        Self::ThaiEsgxNew,
        Self::ThaiEsgxLtf,
        Self::StockInvestment,
        Self::EasyEReceipt,
        Self::HomeLoanInterest,
        Self::NationalSavingsFund,
        Self::DonationGeneral,
        Self::DonationEducation,
        Self::DonationSocialEnterprise,
        Self::DonationPolitical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalAllowance => "personal_allowance",
            Self::SpouseAllowance => "spouse_allowance",
            Self::ChildAllowance => "child_allowance",
            Self::ParentSupport => "parent_support",
            Self::DisabledSupport => "disabled_support",
            Self::LifeInsurance => "life_insurance",
            Self::LifeInsurancePension => "life_insurance_pension",
            Self::ParentLifeInsurance => "parent_life_insurance",
            Self::HealthInsurance => "health_insurance",
            Self::ParentHealthInsurance => "parent_health_insurance",
            Self::SocialSecurity => "social_security",
            Self::PensionInsurance => "pension_insurance",
            Self::ProvidentFund => "provident_fund",
            Self::GovernmentPensionFund => "government_pension_fund",
            Self::PrivateTeacherFund => "private_teacher_fund",
            Self::RetirementMutualFund => "retirement_mutual_fund",
            Self::ThaiEsg => "thai_esg",
            Self::ThaiEsgxNew => "thai_esgx_new",
            Self::ThaiEsgxLtf => "thai_esgx_ltf",
            Self::StockInvestment => "stock_investment",
            Self::EasyEReceipt => "easy_e_receipt",
            Self::HomeLoanInterest => "home_loan_interest",
            Self::NationalSavingsFund => "national_savings_fund",
            Self::DonationGeneral => "donation_general",
            Self::DonationEducation => "donation_education",
            Self::DonationSocialEnterprise => "donation_social_enterprise",
            Self::DonationPolitical => "donation_political",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for DeductionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cap rule for one [`DeductionKind`] in a tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRule {
    pub kind: DeductionKind,
    pub cap: DeductionCap,
    #[serde(default = "default_multiplier", skip_serializing_if = "is_unit_multiplier")]
    pub multiplier: Decimal,
}

impl DeductionRule {
    pub fn new(
        kind: DeductionKind,
        cap: DeductionCap,
    ) -> Self {
        Self {
            kind,
            cap,
            multiplier: Decimal::ONE,
        }
    }

    /// Builds a line item for `declared_amount` under this rule.
    pub fn line_item(
        &self,
        declared_amount: Decimal,
    ) -> DeductionLineItem {
        DeductionLineItem::new(self.kind.as_str(), declared_amount, self.cap)
            .with_multiplier(self.multiplier)
    }
}
