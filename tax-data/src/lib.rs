//! Loading tax year data from files.
//!
//! Bracket schedules come from CSV ([`TaxBracketLoader`]); complete tax year
//! configurations come from TOML ([`load_tax_year_config`]).

mod config;
mod loader;
pub mod logging;

pub use config::{ConfigError, apply_brackets, load_tax_year_config, parse_tax_year_config};
pub use loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
