use dsr_core::dsr::amortization::{fixed_installment, monthly_rate};
use dsr_core::dsr::engine::{calculate_dsr, compute_dsr};
use dsr_core::dsr::params::LoanParameters;
use dsr_core::dsr::schedule::{generate_actual_schedule, generate_stress_schedule};
use dsr_core::{CollateralType, DsrError, RepaymentMethod};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Reference scenarios
// ===========================================================================

fn scenario_a() -> LoanParameters {
    LoanParameters {
        annual_income: dec!(50_000_000),
        loan_amount: dec!(300_000_000),
        interest_rate: dec!(4.5),
        loan_term_year: 30,
        grace_period_year: 0,
        repayment_method: RepaymentMethod::EqualInstallment,
        collateral_type: CollateralType::Housing,
        apply_stress_dsr: false,
    }
}

fn scenario_b() -> LoanParameters {
    LoanParameters {
        grace_period_year: 5,
        ..scenario_a()
    }
}

fn scenario_c() -> LoanParameters {
    LoanParameters {
        collateral_type: CollateralType::Other,
        ..scenario_b()
    }
}

fn scenario_d() -> LoanParameters {
    LoanParameters {
        apply_stress_dsr: true,
        ..scenario_a()
    }
}

fn scenario_e() -> LoanParameters {
    LoanParameters {
        repayment_method: RepaymentMethod::EqualPrincipal,
        ..scenario_a()
    }
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

#[test]
fn test_scenario_a_equal_installment_no_grace() {
    let r = compute_dsr(&scenario_a());

    assert_eq!(r.monthly_payments.len(), 360);

    // Annuity on 300M over 360 months at 0.375%: 1,520,055.93
    let first = r.monthly_payments[0].payment;
    assert_close(first, dec!(1_520_055.93), dec!(0.01));
    assert!(r.monthly_payments.iter().all(|e| e.payment == first));

    // (10M + 247.22M / 30) / 50M = 36.48%
    assert!(r.dsr_ratio > dec!(20) && r.dsr_ratio < dec!(40));
    assert_close(r.dsr_ratio, dec!(36.4813), dec!(0.001));
    assert_eq!(r.annual_principal_burden, dec!(10_000_000));
    assert_eq!(r.stress_dsr_rate_used, dec!(4.5));
    assert_eq!(r.total_stress_interest, r.total_interest);
}

#[test]
fn test_scenario_b_housing_grace_raises_ratio() {
    let a = compute_dsr(&scenario_a());
    let b = compute_dsr(&scenario_b());

    assert_eq!(b.annual_principal_burden, dec!(12_000_000));
    assert!(b.annual_principal_burden > a.annual_principal_burden);
    assert!(b.dsr_ratio > a.dsr_ratio);
    assert_close(b.dsr_ratio, dec!(41.8499), dec!(0.001));

    // First five years are interest only on the full principal
    for entry in &b.monthly_payments[..60] {
        assert_eq!(entry.principal, Decimal::ZERO);
        assert_eq!(entry.interest, dec!(1_125_000));
        assert_eq!(entry.balance, dec!(300_000_000));
    }
    assert!(b.monthly_payments[60].principal > Decimal::ZERO);
}

#[test]
fn test_scenario_c_other_collateral_ignores_grace() {
    let b = compute_dsr(&scenario_b());
    let c = compute_dsr(&scenario_c());

    assert_eq!(c.annual_principal_burden, dec!(10_000_000));
    assert!(c.dsr_ratio < b.dsr_ratio);
    assert_close(c.dsr_ratio, dec!(37.8499), dec!(0.001));
    // Collateral only affects the ratio, never the schedule
    assert_eq!(c.monthly_payments, b.monthly_payments);
}

#[test]
fn test_scenario_d_stress_rate_raises_interest_burden() {
    let a = compute_dsr(&scenario_a());
    let d = compute_dsr(&scenario_d());

    assert_eq!(d.stress_dsr_rate_used, dec!(7.5));
    assert!(d.annual_interest_burden > a.annual_interest_burden);
    assert!(d.dsr_ratio > a.dsr_ratio);
    assert_close(d.dsr_ratio, dec!(50.3434), dec!(0.001));

    // The displayed schedule stays at the contracted rate
    assert_eq!(d.monthly_payments, a.monthly_payments);
    assert_eq!(d.total_interest, a.total_interest);
}

#[test]
fn test_scenario_e_equal_principal() {
    let p = scenario_e();
    let r = compute_dsr(&p);
    let share = p.loan_amount / Decimal::from(p.total_months());

    for entry in &r.monthly_payments {
        assert_eq!(entry.principal, share);
    }
    for pair in r.monthly_payments.windows(2) {
        assert!(
            pair[1].interest < pair[0].interest,
            "interest should fall: month {} {} -> month {} {}",
            pair[0].month,
            pair[0].interest,
            pair[1].month,
            pair[1].interest
        );
    }
}

// ===========================================================================
// Invariants on the reference scenarios
// ===========================================================================

#[test]
fn test_principal_sums_to_loan_amount() {
    for p in [scenario_a(), scenario_b(), scenario_c(), scenario_d(), scenario_e()] {
        let r = compute_dsr(&p);
        let principal: Decimal = r.monthly_payments.iter().map(|e| e.principal).sum();
        assert_close(principal, p.loan_amount, p.loan_amount * dec!(0.000001));
    }
}

#[test]
fn test_entries_are_internally_consistent() {
    for p in [scenario_a(), scenario_b(), scenario_e()] {
        let r = compute_dsr(&p);
        let mut previous = p.loan_amount;
        for e in &r.monthly_payments {
            assert_close(e.principal + e.interest, e.payment, dec!(0.000001));
            assert!(e.balance <= previous);
            assert!(e.balance >= Decimal::ZERO);
            previous = e.balance;
        }
    }
}

#[test]
fn test_zero_income_gives_zero_ratio() {
    let p = LoanParameters {
        annual_income: Decimal::ZERO,
        ..scenario_a()
    };
    assert_eq!(compute_dsr(&p).dsr_ratio, Decimal::ZERO);
}

#[test]
fn test_repeated_calls_are_identical() {
    let p = scenario_b();
    assert_eq!(compute_dsr(&p), compute_dsr(&p));
}

// ===========================================================================
// Installment basis and degenerate inputs
// ===========================================================================

#[test]
fn test_post_grace_installment_is_keyed_to_original_principal() {
    // With no principal repaid during grace, the balance at the start of
    // repayment equals the original principal, so re-amortising would give
    // the same payment. This pins the current basis should grace-period
    // principal payments ever be introduced.
    let r = compute_dsr(&scenario_b());
    let expected = fixed_installment(dec!(300_000_000), monthly_rate(dec!(4.5)), 300);
    assert_eq!(r.monthly_payments[60].payment, expected);
    assert_eq!(r.monthly_payments[359].payment, expected);
}

#[test]
fn test_all_grace_housing_falls_back_to_loan_amount() {
    let p = LoanParameters {
        loan_term_year: 5,
        grace_period_year: 5,
        ..scenario_a()
    };
    let r = compute_dsr(&p);
    assert_eq!(r.annual_principal_burden, dec!(300_000_000));
    assert_eq!(r.monthly_payments.len(), 60);
    assert!(r.monthly_payments.iter().all(|e| e.principal.is_zero()));
    assert_eq!(r.monthly_payments[59].balance, dec!(300_000_000));

    // The validated entry point rejects the same scenario
    match calculate_dsr(&p).unwrap_err() {
        DsrError::InvalidInput { field, .. } => assert_eq!(field, "grace_period_year"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_zero_rate_loan() {
    let p = LoanParameters {
        interest_rate: Decimal::ZERO,
        loan_term_year: 10,
        ..scenario_a()
    };
    let r = compute_dsr(&p);
    assert_eq!(r.total_interest, Decimal::ZERO);
    assert_eq!(r.monthly_payments[0].payment, dec!(2_500_000));
    assert_eq!(r.dsr_ratio, dec!(60));
}

// ===========================================================================
// Independent passes
// ===========================================================================

#[test]
fn test_passes_are_independently_callable() {
    let p = scenario_d();
    let actual = generate_actual_schedule(&p);
    let stress = generate_stress_schedule(&p);
    let combined = compute_dsr(&p);

    assert_eq!(actual.monthly_payments, combined.monthly_payments);
    assert_eq!(actual.total_interest, combined.total_interest);
    assert_eq!(stress.total_stress_interest, combined.total_stress_interest);
    assert_eq!(stress.stress_rate_used, combined.stress_dsr_rate_used);
}

#[test]
fn test_calculate_dsr_envelope_serializes() {
    let out = calculate_dsr(&scenario_d()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["stress_dsr_rate_used"], "7.5");
    assert_eq!(json["result"]["monthly_payments"].as_array().unwrap().len(), 360);
    assert_eq!(json["result"]["yearly_summary"].as_array().unwrap().len(), 30);
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Boundary extremes
// ===========================================================================

#[test]
fn test_tiny_income_does_not_panic() {
    let p = LoanParameters {
        annual_income: dec!(0.0000000000000000000001),
        ..scenario_a()
    };
    let out = calculate_dsr(&p).unwrap();
    assert_eq!(out.result.dsr_ratio, Decimal::MAX);
}

#[test]
fn test_overlong_term_rejected_before_scheduling() {
    let p = LoanParameters {
        loan_term_year: 4_000_000_000,
        ..scenario_a()
    };
    match calculate_dsr(&p).unwrap_err() {
        DsrError::InvalidInput { field, .. } => assert_eq!(field, "loan_term_year"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}
