//! Integration tests for loading tax year data from the checked-in files.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{
    DeductionKind, IncomeCategory, TaxEngine, TaxMethod, TaxRequest, TaxYearConfig,
    TaxYearRegistry,
};
use tax_data::{
    TaxBracketLoader, TaxBracketLoaderError, apply_brackets, load_tax_year_config,
    parse_tax_year_config,
};

const TEST_CSV_2025: &str = include_str!("../test-data/tax_brackets_2025.csv");
const TEST_TOML_2025: &str = include_str!("../test-data/tax_year_2025.toml");

fn scenario(engine: &TaxEngine) -> TaxRequest {
    TaxRequest::new(dec!(600000), IncomeCategory::Wages).with_deduction(
        engine
            .line_item(DeductionKind::PersonalAllowance, dec!(60000))
            .expect("catalogue rule"),
    )
}

#[test]
fn test_csv_schedule_matches_builtin() {
    let table = TaxBracketLoader::load_year(TEST_CSV_2025.as_bytes(), 2025)
        .expect("Failed to load 2025 brackets");

    assert_eq!(table, TaxYearConfig::year_2025().brackets);
}

#[test]
fn test_csv_missing_year() {
    let result = TaxBracketLoader::load_year(TEST_CSV_2025.as_bytes(), 2024);

    assert!(matches!(result, Err(TaxBracketLoaderError::TaxYearNotFound(2024))));
}

#[test]
fn test_toml_config_matches_builtin() {
    let config = parse_tax_year_config(TEST_TOML_2025).expect("Failed to parse 2025 config");

    assert_eq!(config, TaxYearConfig::year_2025());
}

#[test]
fn test_load_config_from_disk() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/tax_year_2025.toml");

    let config = load_tax_year_config(&path).expect("Failed to load 2025 config");

    assert_eq!(config.tax_year, 2025);
    assert_eq!(config.deduction_rules.len(), DeductionKind::ALL.len());
}

#[test]
fn test_loaded_config_computes_worked_scenario() {
    let config = parse_tax_year_config(TEST_TOML_2025).expect("Failed to parse 2025 config");
    let brackets = TaxBracketLoader::load_year(TEST_CSV_2025.as_bytes(), 2025)
        .expect("Failed to load 2025 brackets");
    let engine = TaxEngine::new(apply_brackets(config, brackets));

    let result = engine
        .compute_tax(&scenario(&engine))
        .expect("Scenario should compute");

    assert_eq!(result.taxable_income, dec!(440000));
    assert_eq!(result.tax_amount, dec!(21500));
    assert_eq!(result.method, TaxMethod::Progressive);

    let savings: Vec<_> = engine
        .plan_savings(&result)
        .iter()
        .map(|tier| tier.tax_saving)
        .collect();
    assert_eq!(savings, vec![dec!(6000), dec!(10000), dec!(14500)]);
}

#[test]
fn test_registry_holds_loaded_year_beside_builtin() {
    let mut config = parse_tax_year_config(TEST_TOML_2025).expect("Failed to parse 2025 config");
    config.tax_year = 2026;
    config.minimum_tax.de_minimis = dec!(0);

    let mut registry = TaxYearRegistry::builtin();
    registry.register(config);

    assert_eq!(registry.years(), vec![2025, 2026]);

    // Fully expensed rental income: 1,000,000 × 0.5% = 5,000
    let request =
        TaxRequest::new(dec!(1000000), IncomeCategory::Rental).with_actual_expenses(dec!(1000000));
    let old = registry.get(2025).unwrap().compute_tax(&request).unwrap();
    let new = registry.get(2026).unwrap().compute_tax(&request).unwrap();

    assert_eq!((old.tax_amount, old.method), (dec!(0), TaxMethod::Progressive));
    assert_eq!((new.tax_amount, new.method), (dec!(5000), TaxMethod::Minimum));
}
