//! TOML loader for [`TaxYearConfig`].
//!
//! Monetary values and rates are written as quoted strings so they reach
//! `Decimal` without passing through a float. Caps use the externally tagged
//! form of [`tax_core::DeductionCap`]:
//!
//! ```toml
//! tax_year = 2025
//!
//! [[brackets]]
//! upper_bound = "150000"
//! rate = "0"
//!
//! [[brackets]]
//! rate = "0.35"
//!
//! [[deduction_rules]]
//! kind = "pension_insurance"
//! cap = { min_of = { fixed = "200000", percent = "0.15" } }
//! ```
//!
//! See `test-data/tax_year_2025.toml` for a complete file.

use std::fs;
use std::path::{Path, PathBuf};

use tax_core::{BracketTable, TaxYearConfig};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tax year config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse a tax year configuration from TOML text.
pub fn parse_tax_year_config(input: &str) -> Result<TaxYearConfig, ConfigError> {
    let config: TaxYearConfig = toml::from_str(input)?;
    debug!(
        tax_year = config.tax_year,
        brackets = config.brackets.brackets().len(),
        deduction_rules = config.deduction_rules.len(),
        "parsed tax year config"
    );
    Ok(config)
}

/// Read and parse a tax year configuration file.
pub fn load_tax_year_config(path: &Path) -> Result<TaxYearConfig, ConfigError> {
    let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tax_year_config(&input)
}

/// Replace the schedule of `config` with one loaded separately.
pub fn apply_brackets(
    config: TaxYearConfig,
    brackets: BracketTable,
) -> TaxYearConfig {
    debug!(tax_year = config.tax_year, "replacing bracket schedule");
    config.with_brackets(brackets)
}
