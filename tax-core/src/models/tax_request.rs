use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{DeductionLineItem, IncomeCategory, IncomeSubtype};

/// How the expense deduction is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseMethod {
    /// Statutory formula for the income category.
    #[default]
    Standard,
    /// Declared actual expenses, used as-is.
    Actual(Decimal),
}

/// Input for a single liability computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRequest {
    pub gross_income: Decimal,
    pub category: IncomeCategory,
    #[serde(default)]
    pub subtype: Option<IncomeSubtype>,
    #[serde(default)]
    pub expense_method: ExpenseMethod,
    #[serde(default)]
    pub deductions: Vec<DeductionLineItem>,
}

impl TaxRequest {
    pub fn new(
        gross_income: Decimal,
        category: IncomeCategory,
    ) -> Self {
        Self {
            gross_income,
            category,
            subtype: None,
            expense_method: ExpenseMethod::Standard,
            deductions: Vec::new(),
        }
    }

    pub fn with_subtype(
        mut self,
        subtype: IncomeSubtype,
    ) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_actual_expenses(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.expense_method = ExpenseMethod::Actual(amount);
        self
    }

    pub fn with_deduction(
        mut self,
        item: DeductionLineItem,
    ) -> Self {
        self.deductions.push(item);
        self
    }
}

/// Which method produced the final tax amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMethod {
    Progressive,
    Minimum,
}

/// Outcome of a liability computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,

    /// Expense deduction applied before personal deductions.
    pub expense_deduction: Decimal,

    /// Sum of the capped personal deduction line items.
    pub total_deductions: Decimal,

    /// Net income the progressive schedule is applied to. Never negative.
    pub taxable_income: Decimal,

    /// Tax under the bracket schedule.
    pub progressive_tax: Decimal,

    /// Flat minimum tax on gross income, zero when the category is not subject to it.
    pub minimum_tax: Decimal,

    /// Final liability in whole currency units.
    pub tax_amount: Decimal,

    /// `tax_amount / gross_income`, zero when gross income is zero.
    pub effective_rate: Decimal,

    pub method: TaxMethod,
}

impl TaxResult {
    /// Effective rate as a percentage rounded to two decimal places.
    pub fn effective_rate_percent(&self) -> Decimal {
        round_half_up(self.effective_rate * Decimal::ONE_HUNDRED)
    }
}
