use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{BracketTable, BracketTableError, TaxBracket};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule for tax year {tax_year}: {source}")]
    InvalidSchedule {
        tax_year: i32,
        #[source]
        source: BracketTableError,
    },

    #[error("Tax year {0} not found in bracket data")]
    TaxYearNotFound(i32),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2025)
/// - `upper_bound`: Inclusive upper bound of the bracket (empty for unbounded)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.05 for 5%)
///
/// Rows for a year are listed in ascending bracket order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive schedules stored as CSV.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by tax year and validate each group as a [`BracketTable`].
    ///
    /// Records keep their file order within a year.
    pub fn tables(
        records: &[TaxBracketRecord]
    ) -> Result<BTreeMap<i32, BracketTable>, TaxBracketLoaderError> {
        let mut groups: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            groups.entry(record.tax_year).or_default().push(TaxBracket {
                upper_bound: record.upper_bound,
                rate: record.rate,
            });
        }

        groups
            .into_iter()
            .map(|(tax_year, brackets)| {
                debug!(tax_year, brackets = brackets.len(), "validating bracket table");
                BracketTable::new(brackets)
                    .map(|table| (tax_year, table))
                    .map_err(|source| TaxBracketLoaderError::InvalidSchedule { tax_year, source })
            })
            .collect()
    }

    /// Parse `reader` and return the table for `tax_year`.
    pub fn load_year<R: Read>(
        reader: R,
        tax_year: i32,
    ) -> Result<BracketTable, TaxBracketLoaderError> {
        let records = Self::parse(reader)?;

        Self::tables(&records)?
            .remove(&tax_year)
            .ok_or(TaxBracketLoaderError::TaxYearNotFound(tax_year))
    }
}
