use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::params::LoanParameters;
use super::ratio;
use super::schedule::{self, MonthlyPaymentEntry, STRESS_RATE_ADD_ON};
use super::summary::{self, YearlySummary};
use crate::{types::*, DsrResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Annual principal + interest burden as a percentage of income.
    pub dsr_ratio: Percent,
    pub monthly_payments: Vec<MonthlyPaymentEntry>,
    pub total_interest: Money,
    pub total_payment: Money,
    pub avg_monthly_payment: Money,
    /// Rate the stress pass ran at; the nominal rate when stress is off.
    pub stress_dsr_rate_used: Percent,
    pub total_stress_interest: Money,
    pub annual_principal_burden: Money,
    pub annual_interest_burden: Money,
    pub yearly_summary: Vec<YearlySummary>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run both passes and aggregate the ratio. Pure and infallible: degenerate
/// inputs produce fallback values rather than errors.
pub fn compute_dsr(params: &LoanParameters) -> CalculationResult {
    let actual = schedule::generate_actual_schedule(params);
    let stress = schedule::generate_stress_schedule(params);
    let breakdown = ratio::aggregate(params, stress.total_stress_interest);

    let months = actual.monthly_payments.len();
    let avg_monthly_payment = if months == 0 {
        Decimal::ZERO
    } else {
        actual.total_payment / Decimal::from(months)
    };

    let yearly_summary = summary::summarize_by_year(&actual.monthly_payments);

    tracing::debug!(dsr_ratio = %breakdown.dsr_ratio, "dsr computed");

    CalculationResult {
        dsr_ratio: breakdown.dsr_ratio,
        monthly_payments: actual.monthly_payments,
        total_interest: actual.total_interest,
        total_payment: actual.total_payment,
        avg_monthly_payment,
        stress_dsr_rate_used: stress.stress_rate_used,
        total_stress_interest: stress.total_stress_interest,
        annual_principal_burden: breakdown.annual_principal_burden,
        annual_interest_burden: breakdown.annual_interest_burden,
        yearly_summary,
    }
}

/// Validate the scenario, compute the ratio and wrap it in the standard
/// output envelope.
pub fn calculate_dsr(params: &LoanParameters) -> DsrResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    params.validate()?;

    if params.annual_income.is_zero() {
        warnings.push("Annual income is zero; DSR reported as 0.".into());
    }
    if params.loan_amount.is_zero() {
        warnings.push("Loan amount is zero; schedule contains no principal.".into());
    }

    let result = compute_dsr(params);

    if params.apply_stress_dsr {
        warnings.push(format!(
            "Stress add-on of {STRESS_RATE_ADD_ON}pp applied: interest burden computed at {}%.",
            result.stress_dsr_rate_used
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "interest_rate_pct": params.interest_rate.to_string(),
        "stress_add_on_pct": STRESS_RATE_ADD_ON.to_string(),
        "stress_applied": params.apply_stress_dsr,
        "repayment_method": params.repayment_method,
        "collateral_type": params.collateral_type,
        "grace_period_year": params.grace_period_year,
        "installment_basis": "original principal over post-grace months",
    });

    Ok(with_metadata(
        "Debt Service Ratio (actual + stress amortisation)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DsrError;
    use rust_decimal_macros::dec;

    fn base_params() -> LoanParameters {
        LoanParameters {
            annual_income: dec!(80_000),
            loan_amount: dec!(120_000),
            interest_rate: dec!(6),
            loan_term_year: 10,
            grace_period_year: 0,
            repayment_method: RepaymentMethod::EqualPrincipal,
            collateral_type: CollateralType::Housing,
            apply_stress_dsr: false,
        }
    }

    #[test]
    fn test_equal_principal_totals() {
        let r = compute_dsr(&base_params());
        assert_eq!(r.monthly_payments.len(), 120);
        // Interest = 0.005 * 1,000 * (120 + 119 + ... + 1) = 5 * 7,260
        assert_eq!(r.total_interest, dec!(36_300));
        assert_eq!(r.total_payment, dec!(156_300));
        assert_eq!(r.avg_monthly_payment, dec!(1_302.5));
    }

    #[test]
    fn test_ratio_matches_breakdown() {
        let r = compute_dsr(&base_params());
        // principal 12,000/yr, interest 3,630/yr over 80,000
        assert_eq!(r.annual_principal_burden, dec!(12_000));
        assert_eq!(r.annual_interest_burden, dec!(3_630));
        assert_eq!(r.dsr_ratio, dec!(19.5375));
        assert_eq!(r.stress_dsr_rate_used, dec!(6));
    }

    #[test]
    fn test_yearly_summary_matches_schedule() {
        let r = compute_dsr(&base_params());
        assert_eq!(r.yearly_summary.len(), 10);
        let principal: Decimal = r.yearly_summary.iter().map(|y| y.principal_paid).sum();
        assert_eq!(principal, dec!(120_000));
        assert_eq!(r.yearly_summary[9].closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_average_guard() {
        let mut p = base_params();
        p.loan_term_year = 0;
        let r = compute_dsr(&p);
        assert!(r.monthly_payments.is_empty());
        assert_eq!(r.avg_monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_rejects_degenerate_grace() {
        let mut p = base_params();
        p.grace_period_year = 10;
        match calculate_dsr(&p).unwrap_err() {
            DsrError::InvalidInput { field, .. } => assert_eq!(field, "grace_period_year"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_calculate_envelope() {
        let out = calculate_dsr(&base_params()).unwrap();
        assert!(!out.methodology.is_empty());
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.assumptions["stress_applied"], false);
        assert_eq!(out.result, compute_dsr(&base_params()));
    }

    #[test]
    fn test_calculate_warns_on_stress_and_zero_income() {
        let mut p = base_params();
        p.apply_stress_dsr = true;
        p.annual_income = Decimal::ZERO;
        let out = calculate_dsr(&p).unwrap();
        assert_eq!(out.result.dsr_ratio, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings.iter().any(|w| w.contains("9.0%")));
    }
}
