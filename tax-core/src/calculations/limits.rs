//! Statutory limits on personal deductions.
//!
//! Violations are reported, never clamped: the caller decides whether to
//! reject the request or lower the offending items and try again.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::models::{DeductionLineItem, Violation};

/// Checks deduction line items against their caps.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::DeductionLimitValidator;
/// use tax_core::{DeductionCap, DeductionLineItem};
///
/// let pension = DeductionLineItem::new(
///     "pension_insurance",
///     dec!(274920),
///     DeductionCap::MinOf { fixed: dec!(200000), percent: dec!(0.15) },
/// );
/// let health = DeductionLineItem::new("health_insurance", dec!(30000), DeductionCap::Fixed(dec!(25000)));
///
/// let violations = DeductionLimitValidator.validate(dec!(1500000), &[pension, health]).unwrap_err();
///
/// assert_eq!(violations.len(), 2);
/// assert_eq!(violations[0].legal_max, dec!(200000));
/// assert_eq!(violations[0].excess, dec!(74920));
/// assert_eq!(violations[1].excess, dec!(5000));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DeductionLimitValidator;

impl DeductionLimitValidator {
    /// Largest recorded amount `item` may count for at `gross_income`.
    pub fn legal_max(
        &self,
        gross_income: Decimal,
        item: &DeductionLineItem,
    ) -> Decimal {
        item.cap.legal_max(gross_income)
    }

    /// Returns the violation for a single item, if any.
    pub fn check(
        &self,
        gross_income: Decimal,
        item: &DeductionLineItem,
    ) -> Option<Violation> {
        let declared = item.recorded_amount();
        let legal_max = self.legal_max(gross_income, item);

        (declared > legal_max).then(|| Violation {
            name: item.name.clone(),
            declared,
            legal_max,
            excess: declared.saturating_sub(legal_max),
        })
    }

    /// Validates every item and collects all violations, in input order.
    pub fn validate(
        &self,
        gross_income: Decimal,
        items: &[DeductionLineItem],
    ) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> = items
            .iter()
            .filter_map(|item| self.check(gross_income, item))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Amount the item actually deducts: its recorded amount, limited to the cap.
    pub fn capped_amount(
        &self,
        gross_income: Decimal,
        item: &DeductionLineItem,
    ) -> Decimal {
        non_negative(item.recorded_amount().min(self.legal_max(gross_income, item)))
    }

    pub fn capped_total(
        &self,
        gross_income: Decimal,
        items: &[DeductionLineItem],
    ) -> Decimal {
        items
            .iter()
            .map(|item| self.capped_amount(gross_income, item))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Recorded amount still available under the item's cap.
    pub fn headroom(
        &self,
        gross_income: Decimal,
        item: &DeductionLineItem,
    ) -> Decimal {
        non_negative(
            self.legal_max(gross_income, item)
                .saturating_sub(item.recorded_amount()),
        )
    }
}
