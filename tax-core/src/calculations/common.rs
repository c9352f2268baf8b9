//! Common numeric helpers for the tax calculators.
//!
//! Amounts owed and deducted are whole currency units, so most calculators
//! finish with [`whole_units`]. Presentation values such as percentages use
//! [`round_half_up`].

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3.584)), dec!(3.58));
/// assert_eq!(round_half_up(dec!(3.585)), dec!(3.59));
/// assert_eq!(round_half_up(dec!(-3.585)), dec!(-3.59)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Drops the fractional part of a non-negative amount.
///
/// Negative inputs are clamped to zero first; nothing in the engine owes or
/// deducts a negative amount.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::whole_units;
///
/// assert_eq!(whole_units(dec!(7499.99)), dec!(7499));
/// assert_eq!(whole_units(dec!(-12.5)), dec!(0));
/// ```
pub fn whole_units(value: Decimal) -> Decimal {
    non_negative(value).floor()
}

/// Returns `value`, or zero if it is negative.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
