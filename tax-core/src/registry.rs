use std::collections::BTreeMap;

use thiserror::Error;

use crate::engine::TaxEngine;
use crate::models::TaxYearConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no configuration registered for tax year {year}; available: {available:?}")]
    UnknownTaxYear { year: i32, available: Vec<i32> },
}

/// Engines for several tax years, keyed by year.
///
/// Typical lifetime:
/// 1. Start from [`TaxYearRegistry::builtin`] or [`TaxYearRegistry::new`].
/// 2. Call `register` once per loaded configuration.
/// 3. Call `get` whenever a computation for a given year is needed.
#[derive(Debug, Clone, Default)]
pub struct TaxYearRegistry {
    engines: BTreeMap<i32, TaxEngine>,
}

impl TaxYearRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every tax year compiled into the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(TaxYearConfig::year_2025());
        registry
    }

    /// Register a tax year, replacing any existing configuration for that year.
    pub fn register(
        &mut self,
        config: TaxYearConfig,
    ) {
        self.engines.insert(config.tax_year, TaxEngine::new(config));
    }

    /// Registered years in ascending order.
    pub fn years(&self) -> Vec<i32> {
        self.engines.keys().copied().collect()
    }

    /// # Errors
    /// * [`RegistryError::UnknownTaxYear`] when `year` was never registered.
    pub fn get(
        &self,
        year: i32,
    ) -> Result<&TaxEngine, RegistryError> {
        self.engines
            .get(&year)
            .ok_or_else(|| RegistryError::UnknownTaxYear {
                year,
                available: self.years(),
            })
    }

    /// Engine for the most recent registered year.
    pub fn latest(&self) -> Option<&TaxEngine> {
        self.engines.values().next_back()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config_for(year: i32) -> TaxYearConfig {
        TaxYearConfig {
            tax_year: year,
            ..TaxYearConfig::year_2025()
        }
    }

    #[test]
    fn builtin_contains_2025() {
        let registry = TaxYearRegistry::builtin();

        assert_eq!(registry.years(), vec![2025]);
        assert_eq!(registry.get(2025).unwrap().tax_year(), 2025);
    }

    #[test]
    fn get_unknown_year_lists_available() {
        let registry = TaxYearRegistry::builtin();

        assert_eq!(
            registry.get(1999).unwrap_err(),
            RegistryError::UnknownTaxYear {
                year: 1999,
                available: vec![2025],
            }
        );
    }

    #[test]
    fn years_are_sorted_and_latest_is_last() {
        let mut registry = TaxYearRegistry::new();
        registry.register(config_for(2026));
        registry.register(config_for(2024));
        registry.register(config_for(2025));

        assert_eq!(registry.years(), vec![2024, 2025, 2026]);
        assert_eq!(registry.latest().map(TaxEngine::tax_year), Some(2026));
    }

    #[test]
    fn register_replaces_existing_year() {
        let mut registry = TaxYearRegistry::builtin();
        let mut config = TaxYearConfig::year_2025();
        config.minimum_tax.de_minimis = rust_decimal::Decimal::ZERO;

        registry.register(config);

        assert_eq!(registry.years(), vec![2025]);
        assert_eq!(
            registry.get(2025).unwrap().config().minimum_tax.de_minimis,
            rust_decimal::Decimal::ZERO
        );
    }

    #[test]
    fn empty_registry_has_no_latest() {
        assert!(TaxYearRegistry::new().latest().is_none());
    }
}
