mod deduction;
mod income_category;
mod tax_bracket;
mod tax_request;
mod tax_year_config;

pub use deduction::{DeductionCap, DeductionKind, DeductionLineItem, DeductionRule, Violation};
pub use income_category::{
    BusinessSubtype, IncomeCategory, IncomeSource, IncomeSubtype, ProfessionSubtype,
};
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_request::{ExpenseMethod, TaxMethod, TaxRequest, TaxResult};
pub use tax_year_config::{
    BusinessRate, CappedRate, ExpenseRules, MinimumTaxRules, PlanningTier, ProfessionRate,
    TaxYearConfig, TieredRate,
};
