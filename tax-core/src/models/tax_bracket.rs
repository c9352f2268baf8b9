use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`BracketTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table must contain at least one bracket")]
    Empty,

    #[error("bracket {index} has upper bound {upper_bound}, which does not exceed the previous bound")]
    NotAscending { index: usize, upper_bound: Decimal },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedNotLast(usize),

    #[error("the last bracket must be unbounded")]
    MissingUnbounded,

    #[error("bracket {index} has rate {rate}, expected a fraction between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },
}

/// One step of a progressive schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the bracket. `None` marks the final bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Decimal>,
    /// Marginal rate as a fraction (e.g. `0.05` for 5%).
    pub rate: Decimal,
}

impl TaxBracket {
    pub const fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub const fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// An immutable, validated progressive schedule.
///
/// Brackets are ordered by ascending upper bound and together cover
/// `[0, ∞)`: each bracket starts where the previous one ends and the last
/// bracket is unbounded.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{BracketTable, TaxBracket};
///
/// let table = BracketTable::new(vec![
///     TaxBracket::bounded(dec!(150000), dec!(0)),
///     TaxBracket::bounded(dec!(300000), dec!(0.05)),
///     TaxBracket::unbounded(dec!(0.10)),
/// ])
/// .unwrap();
///
/// // 150,000 at 5% + 40,000 at 10%
/// assert_eq!(table.tax_for(dec!(340000)), dec!(11500));
/// assert_eq!(table.rate_at(dec!(340000)), dec!(0.10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates and wraps a list of brackets.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the list is empty, a rate lies outside
    /// `[0, 1]`, bounds are not strictly ascending, or the unbounded bracket is
    /// missing or not last.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                Some(_) if index == last => return Err(BracketTableError::MissingUnbounded),
                Some(upper_bound) => {
                    if upper_bound <= previous {
                        return Err(BracketTableError::NotAscending { index, upper_bound });
                    }
                    previous = upper_bound;
                }
                None if index != last => return Err(BracketTableError::UnboundedNotLast(index)),
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Wraps a built-in schedule without validating it. Every caller has a
    /// test that runs the same brackets through [`Self::new`].
    pub(crate) fn from_builtin(brackets: &[TaxBracket]) -> Self {
        Self {
            brackets: brackets.to_vec(),
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Lower bound of the bracket at `index` (the previous bracket's upper bound).
    pub fn lower_bound(
        &self,
        index: usize,
    ) -> Decimal {
        match index {
            0 => Decimal::ZERO,
            i => self
                .brackets
                .get(i - 1)
                .and_then(|b| b.upper_bound)
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Finite bracket boundaries in ascending order.
    pub fn boundaries(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.brackets.iter().filter_map(|b| b.upper_bound)
    }

    /// Progressive tax owed on `taxable_income`, floored to whole currency units.
    ///
    /// Each bracket contributes `min(remaining, width) × rate`. Non-positive
    /// income owes nothing.
    pub fn tax_for(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut tax = Decimal::ZERO;
        let mut lower = Decimal::ZERO;

        for bracket in &self.brackets {
            let ceiling = match bracket.upper_bound {
                Some(upper) => taxable_income.min(upper),
                None => taxable_income,
            };
            let in_bracket = ceiling - lower;
            if in_bracket <= Decimal::ZERO {
                break;
            }
            tax = tax.saturating_add(in_bracket * bracket.rate);

            match bracket.upper_bound {
                Some(upper) => lower = upper,
                None => break,
            }
        }

        tax.floor()
    }

    /// Rate of the bracket containing `taxable_income`.
    ///
    /// Upper bounds are inclusive, so income sitting exactly on a boundary
    /// takes the lower bracket's rate.
    pub fn rate_at(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.is_none_or(|upper| taxable_income <= upper))
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}
