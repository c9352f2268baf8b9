use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Statutory income classes, one per assessable-income section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Wages,
    FeesCommissions,
    Royalties,
    InterestDividends,
    Rental,
    IndependentProfession,
    Contracting,
    OtherBusiness,
}

impl IncomeCategory {
    pub const ALL: [Self; 8] = [
        Self::Wages,
        Self::FeesCommissions,
        Self::Royalties,
        Self::InterestDividends,
        Self::Rental,
        Self::IndependentProfession,
        Self::Contracting,
        Self::OtherBusiness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wages => "wages",
            Self::FeesCommissions => "fees_commissions",
            Self::Royalties => "royalties",
            Self::InterestDividends => "interest_dividends",
            Self::Rental => "rental",
            Self::IndependentProfession => "independent_profession",
            Self::Contracting => "contracting",
            Self::OtherBusiness => "other_business",
        }
    }

    /// Section code of the revenue code, e.g. `40(1)` for wages.
    pub fn section(&self) -> &'static str {
        match self {
            Self::Wages => "40(1)",
            Self::FeesCommissions => "40(2)",
            Self::Royalties => "40(3)",
            Self::InterestDividends => "40(4)",
            Self::Rental => "40(5)",
            Self::IndependentProfession => "40(6)",
            Self::Contracting => "40(7)",
            Self::OtherBusiness => "40(8)",
        }
    }

    /// Accepts either the snake_case name or the section code.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.section() == s)
    }

    /// Whether the flat minimum tax is compared against the progressive
    /// result for this category when a tax year does not override the set.
    pub fn subject_to_minimum_tax(&self) -> bool {
        match self {
            Self::Wages | Self::InterestDividends => false,
            Self::FeesCommissions
            | Self::Royalties
            | Self::Rental
            | Self::IndependentProfession
            | Self::Contracting
            | Self::OtherBusiness => true,
        }
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {}", self.section(), self.as_str())
    }
}

/// Refinement of [`IncomeCategory::IndependentProfession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionSubtype {
    Medical,
    Dentistry,
    Law,
    Architecture,
    Engineering,
    Accounting,
    FineArts,
    #[default]
    Other,
}

impl ProfessionSubtype {
    pub const ALL: [Self; 8] = [
        Self::Medical,
        Self::Dentistry,
        Self::Law,
        Self::Architecture,
        Self::Engineering,
        Self::Accounting,
        Self::FineArts,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Dentistry => "dentistry",
            Self::Law => "law",
            Self::Architecture => "architecture",
            Self::Engineering => "engineering",
            Self::Accounting => "accounting",
            Self::FineArts => "fine_arts",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Refinement of [`IncomeCategory::OtherBusiness`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessSubtype {
    Entertainment,
    HairSalon,
    GeneralTrade,
    Restaurant,
    Photography,
    Cosmetics,
    VehicleRepair,
    Transportation,
    Laundry,
    Printing,
    #[default]
    Other,
}

impl BusinessSubtype {
    pub const ALL: [Self; 11] = [
        Self::Entertainment,
        Self::HairSalon,
        Self::GeneralTrade,
        Self::Restaurant,
        Self::Photography,
        Self::Cosmetics,
        Self::VehicleRepair,
        Self::Transportation,
        Self::Laundry,
        Self::Printing,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entertainment => "entertainment",
            Self::HairSalon => "hair_salon",
            Self::GeneralTrade => "general_trade",
            Self::Restaurant => "restaurant",
            Self::Photography => "photography",
            Self::Cosmetics => "cosmetics",
            Self::VehicleRepair => "vehicle_repair",
            Self::Transportation => "transportation",
            Self::Laundry => "laundry",
            Self::Printing => "printing",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// A subtype as supplied by a caller, before it is checked against the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSubtype {
    Profession(ProfessionSubtype),
    Business(BusinessSubtype),
}

impl IncomeSubtype {
    /// Parses `s` in the context of `category`.
    ///
    /// Professions are tried first unless the category is
    /// [`IncomeCategory::OtherBusiness`], so `"other"` resolves to the subtype
    /// family the category actually uses.
    pub fn parse_for(
        category: IncomeCategory,
        s: &str,
    ) -> Option<Self> {
        let profession = || ProfessionSubtype::parse(s).map(Self::Profession);
        let business = || BusinessSubtype::parse(s).map(Self::Business);

        match category {
            IncomeCategory::OtherBusiness => business().or_else(profession),
            _ => profession().or_else(business),
        }
    }
}

impl fmt::Display for IncomeSubtype {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Profession(p) => write!(f, "profession:{}", p.as_str()),
            Self::Business(b) => write!(f, "business:{}", b.as_str()),
        }
    }
}

/// Income category with its subtype payload, as used by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    Wages,
    FeesCommissions,
    Royalties,
    InterestDividends,
    Rental,
    IndependentProfession(ProfessionSubtype),
    Contracting,
    OtherBusiness(BusinessSubtype),
}

impl IncomeSource {
    /// Combines a category with an optional subtype.
    ///
    /// A missing subtype falls back to the `Other` subtype for the two
    /// categories that use subtypes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedCategorySubtypeCombination`] when
    /// a subtype is supplied for a category that does not use one, or the
    /// subtype belongs to the other family.
    pub fn classify(
        category: IncomeCategory,
        subtype: Option<IncomeSubtype>,
    ) -> Result<Self, ValidationError> {
        let source = match (category, subtype) {
            (IncomeCategory::IndependentProfession, None) => {
                Self::IndependentProfession(ProfessionSubtype::default())
            }
            (IncomeCategory::IndependentProfession, Some(IncomeSubtype::Profession(p))) => {
                Self::IndependentProfession(p)
            }
            (IncomeCategory::OtherBusiness, None) => Self::OtherBusiness(BusinessSubtype::default()),
            (IncomeCategory::OtherBusiness, Some(IncomeSubtype::Business(b))) => {
                Self::OtherBusiness(b)
            }
            (category, Some(subtype)) => {
                return Err(ValidationError::UnsupportedCategorySubtypeCombination {
                    category,
                    subtype,
                });
            }
            (IncomeCategory::Wages, None) => Self::Wages,
            (IncomeCategory::FeesCommissions, None) => Self::FeesCommissions,
            (IncomeCategory::Royalties, None) => Self::Royalties,
            (IncomeCategory::InterestDividends, None) => Self::InterestDividends,
            (IncomeCategory::Rental, None) => Self::Rental,
            (IncomeCategory::Contracting, None) => Self::Contracting,
        };

        Ok(source)
    }

    pub fn category(&self) -> IncomeCategory {
        match self {
            Self::Wages => IncomeCategory::Wages,
            Self::FeesCommissions => IncomeCategory::FeesCommissions,
            Self::Royalties => IncomeCategory::Royalties,
            Self::InterestDividends => IncomeCategory::InterestDividends,
            Self::Rental => IncomeCategory::Rental,
            Self::IndependentProfession(_) => IncomeCategory::IndependentProfession,
            Self::Contracting => IncomeCategory::Contracting,
            Self::OtherBusiness(_) => IncomeCategory::OtherBusiness,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // parsing tests
    // =========================================================================

    #[test]
    fn category_parses_name_and_section() {
        assert_eq!(IncomeCategory::parse("wages"), Some(IncomeCategory::Wages));
        assert_eq!(IncomeCategory::parse("40(8)"), Some(IncomeCategory::OtherBusiness));
        assert_eq!(IncomeCategory::parse(" Rental "), Some(IncomeCategory::Rental));
        assert_eq!(IncomeCategory::parse("salary"), None);
    }

    #[test]
    fn category_round_trips_through_as_str() {
        for category in IncomeCategory::ALL {
            assert_eq!(IncomeCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn subtype_other_resolves_by_category() {
        assert_eq!(
            IncomeSubtype::parse_for(IncomeCategory::OtherBusiness, "other"),
            Some(IncomeSubtype::Business(BusinessSubtype::Other))
        );
        assert_eq!(
            IncomeSubtype::parse_for(IncomeCategory::IndependentProfession, "other"),
            Some(IncomeSubtype::Profession(ProfessionSubtype::Other))
        );
        assert_eq!(
            IncomeSubtype::parse_for(IncomeCategory::Wages, "entertainment"),
            Some(IncomeSubtype::Business(BusinessSubtype::Entertainment))
        );
    }

    // =========================================================================
    // minimum tax designation tests
    // =========================================================================

    #[test]
    fn wages_and_interest_are_never_subject_to_minimum_tax() {
        assert!(!IncomeCategory::Wages.subject_to_minimum_tax());
        assert!(!IncomeCategory::InterestDividends.subject_to_minimum_tax());
        assert!(IncomeCategory::Rental.subject_to_minimum_tax());
        assert!(IncomeCategory::FeesCommissions.subject_to_minimum_tax());
    }

    // =========================================================================
    // classify tests
    // =========================================================================

    #[test]
    fn classify_defaults_missing_subtypes_to_other() {
        assert_eq!(
            IncomeSource::classify(IncomeCategory::IndependentProfession, None),
            Ok(IncomeSource::IndependentProfession(ProfessionSubtype::Other))
        );
        assert_eq!(
            IncomeSource::classify(IncomeCategory::OtherBusiness, None),
            Ok(IncomeSource::OtherBusiness(BusinessSubtype::Other))
        );
    }

    #[test]
    fn classify_keeps_matching_subtype() {
        let source = IncomeSource::classify(
            IncomeCategory::OtherBusiness,
            Some(IncomeSubtype::Business(BusinessSubtype::Entertainment)),
        );

        assert_eq!(source, Ok(IncomeSource::OtherBusiness(BusinessSubtype::Entertainment)));
    }

    #[test]
    fn classify_rejects_subtype_on_plain_category() {
        let subtype = IncomeSubtype::Profession(ProfessionSubtype::Medical);

        let result = IncomeSource::classify(IncomeCategory::Wages, Some(subtype));

        assert_eq!(
            result,
            Err(ValidationError::UnsupportedCategorySubtypeCombination {
                category: IncomeCategory::Wages,
                subtype,
            })
        );
    }

    #[test]
    fn classify_rejects_subtype_from_the_wrong_family() {
        let subtype = IncomeSubtype::Business(BusinessSubtype::Restaurant);

        let result = IncomeSource::classify(IncomeCategory::IndependentProfession, Some(subtype));

        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedCategorySubtypeCombination { .. })
        ));
    }

    #[test]
    fn classify_round_trips_category() {
        for category in IncomeCategory::ALL {
            let source = IncomeSource::classify(category, None).unwrap();
            assert_eq!(source.category(), category);
        }
    }
}
