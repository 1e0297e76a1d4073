use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::params::LoanParameters;
use crate::types::*;

/// The annualised burdens the ratio is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsrBreakdown {
    pub annual_principal_burden: Money,
    pub annual_interest_burden: Money,
    pub dsr_ratio: Percent,
}

/// Principal repaid per year for DSR purposes.
///
/// Housing collateral spreads principal over the years left after grace, so
/// a grace period raises the burden. Other collateral always uses the full
/// term. When the divisor is zero the whole loan amount is the burden.
pub fn annual_principal_burden(params: &LoanParameters) -> Money {
    let years = match params.collateral_type {
        CollateralType::Housing => params.loan_term_year.saturating_sub(params.grace_period_year),
        CollateralType::Other => params.loan_term_year,
    };
    if years > 0 {
        params.loan_amount / Decimal::from(years)
    } else {
        params.loan_amount
    }
}

/// Stress-pass interest averaged over the full term, grace included.
pub fn annual_interest_burden(total_stress_interest: Money, loan_term_year: u32) -> Money {
    if loan_term_year == 0 {
        return Decimal::ZERO;
    }
    total_stress_interest / Decimal::from(loan_term_year)
}

/// `(principal + interest) / income × 100`, or zero without income.
/// Saturates at `Decimal::MAX` when the quotient leaves the decimal range.
pub fn dsr_ratio(
    annual_principal_burden: Money,
    annual_interest_burden: Money,
    annual_income: Money,
) -> Percent {
    if annual_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    annual_principal_burden
        .checked_add(annual_interest_burden)
        .and_then(|burden| burden.checked_div(annual_income))
        .and_then(|share| share.checked_mul(dec!(100)))
        .unwrap_or(Decimal::MAX)
        .max(Decimal::ZERO)
}

/// Combine the loan's principal burden with the stress-pass interest.
pub fn aggregate(params: &LoanParameters, total_stress_interest: Money) -> DsrBreakdown {
    if params.collateral_type == CollateralType::Housing && params.is_degenerate() {
        tracing::warn!(
            loan_term_year = params.loan_term_year,
            grace_period_year = params.grace_period_year,
            "grace period covers the whole term; principal burden falls back to the full loan amount"
        );
    }

    let principal = annual_principal_burden(params);
    let interest = annual_interest_burden(total_stress_interest, params.loan_term_year);

    DsrBreakdown {
        annual_principal_burden: principal,
        annual_interest_burden: interest,
        dsr_ratio: dsr_ratio(principal, interest, params.annual_income),
    }
}
