//! Properties that must hold for any request under the 2025 schedule.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::{
    BusinessSubtype, DeductionKind, IncomeCategory, IncomeSubtype, TaxEngine, TaxMethod,
    TaxRequest, TaxYearConfig, TaxYearRegistry, ValidationError,
};

/// Gross incomes from 0 to 8,000,000 in steps of 25,000.
fn income_grid() -> impl Iterator<Item = Decimal> {
    (0..=320).map(|step| Decimal::from(step * 25_000))
}

fn wages(gross: Decimal) -> TaxRequest {
    TaxRequest::new(gross, IncomeCategory::Wages)
}

// =============================================================================
// worked scenario
// =============================================================================

#[test]
fn worked_scenario_through_registry() {
    let registry = TaxYearRegistry::builtin();
    let engine = registry.get(2025).unwrap();
    let request = wages(dec!(600000)).with_deduction(
        engine
            .line_item(DeductionKind::PersonalAllowance, dec!(60000))
            .unwrap(),
    );

    let result = engine.compute_tax(&request).unwrap();

    assert_eq!(result.expense_deduction, dec!(100000));
    assert_eq!(result.total_deductions, dec!(60000));
    assert_eq!(result.taxable_income, dec!(440000));
    assert_eq!(result.tax_amount, dec!(21500));
    assert_eq!(result.method, TaxMethod::Progressive);
}

// =============================================================================
// schedule properties
// =============================================================================

#[test]
fn tax_is_monotonic_in_gross_income() {
    let engine = TaxEngine::default();
    let mut previous = Decimal::ZERO;

    for gross in income_grid() {
        let tax = engine.compute_tax(&wages(gross)).unwrap().tax_amount;
        assert!(tax >= previous, "tax fell from {previous} to {tax} at {gross}");
        previous = tax;
    }
}

#[test]
fn results_are_never_negative() {
    let engine = TaxEngine::default();
    let entertainer = IncomeSubtype::Business(BusinessSubtype::Entertainment);

    for gross in income_grid() {
        let request = TaxRequest::new(gross, IncomeCategory::OtherBusiness)
            .with_subtype(entertainer)
            .with_actual_expenses(gross * dec!(2));

        let result = engine.compute_tax(&request).unwrap();

        assert!(result.taxable_income >= Decimal::ZERO);
        assert!(result.tax_amount >= Decimal::ZERO);
        assert!(result.effective_rate >= Decimal::ZERO);
    }
}

#[test]
fn tax_is_continuous_across_boundaries() {
    let config = TaxYearConfig::year_2025();

    for boundary in config.brackets.boundaries() {
        let below = config.brackets.tax_for(boundary - Decimal::ONE);
        let at = config.brackets.tax_for(boundary);
        let above = config.brackets.tax_for(boundary + Decimal::ONE);

        assert!(at - below <= Decimal::ONE, "jump below {boundary}");
        assert!(above - at <= Decimal::ONE, "jump above {boundary}");
    }
}

#[test]
fn final_tax_is_never_below_progressive_tax() {
    let engine = TaxEngine::default();

    for gross in income_grid() {
        let request = TaxRequest::new(gross, IncomeCategory::Contracting)
            .with_actual_expenses(gross * dec!(0.95));
        let result = engine.compute_tax(&request).unwrap();

        assert!(result.tax_amount >= result.progressive_tax);
        assert!(result.tax_amount == result.progressive_tax || result.tax_amount == result.minimum_tax);
    }
}

// =============================================================================
// differential saving
// =============================================================================

#[test]
fn saving_never_exceeds_tax_at_base() {
    let engine = TaxEngine::default();

    for base in income_grid() {
        let tax = engine.config().brackets.tax_for(base);
        assert!(engine.compute_saving(base, dec!(100000)) <= tax);
    }
}

#[test]
fn saving_grows_with_deduction() {
    let engine = TaxEngine::default();
    let mut previous = Decimal::ZERO;

    for step in 0..=40 {
        let saving = engine.compute_saving(dec!(1200000), Decimal::from(step * 25_000));
        assert!(saving >= previous);
        previous = saving;
    }
}

#[test]
fn boundary_straddling_saving_differs_from_marginal_estimate() {
    let engine = TaxEngine::default();

    // 350,000 sits in the 10% bracket; 60,000 drops to 290,000 (5%)
    let base = dec!(350000);
    let amount = dec!(60000);

    assert_eq!(engine.marginal_rate(base), dec!(0.10));
    assert_eq!(engine.compute_saving(base, amount), dec!(5500));
    assert_ne!(engine.compute_saving(base, amount), amount * engine.marginal_rate(base));
}

// =============================================================================
// minimum tax
// =============================================================================

#[test]
fn minimum_tax_threshold_is_exclusive() {
    let engine = TaxEngine::default();

    let fully_expensed = |gross: Decimal| {
        TaxRequest::new(gross, IncomeCategory::Royalties).with_actual_expenses(gross)
    };

    let at = engine.compute_tax(&fully_expensed(dec!(1000000))).unwrap();
    let above = engine.compute_tax(&fully_expensed(dec!(1000200))).unwrap();

    assert_eq!((at.tax_amount, at.method), (dec!(0), TaxMethod::Progressive));
    assert_eq!((above.tax_amount, above.method), (dec!(5001), TaxMethod::Minimum));
}

// =============================================================================
// errors
// =============================================================================

#[test]
fn violations_are_aggregated_across_items() {
    let engine = TaxEngine::default();
    let mut request = wages(dec!(1000000));
    for (kind, amount) in [
        (DeductionKind::HealthInsurance, dec!(26000)),
        (DeductionKind::SocialSecurity, dec!(9000)),
        (DeductionKind::DonationPolitical, dec!(20000)),
        (DeductionKind::ThaiEsg, dec!(400000)),
    ] {
        request = request.with_deduction(engine.line_item(kind, amount).unwrap());
    }

    match engine.compute_tax(&request) {
        Err(ValidationError::DeductionLimitViolation(violations)) => {
            let excess: Vec<_> = violations.iter().map(|v| (v.name.as_str(), v.excess)).collect();
            assert_eq!(
                excess,
                vec![
                    ("health_insurance", dec!(1000)),
                    ("donation_political", dec!(10000)),
                    ("thai_esg", dec!(100000)),
                ]
            );
        }
        other => panic!("expected violations, got {other:?}"),
    }
}
