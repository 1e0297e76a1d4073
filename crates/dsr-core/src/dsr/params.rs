use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{types::*, DsrError, DsrResult};

/// Longest term accepted at the boundary.
pub const MAX_LOAN_TERM_YEAR: u32 = 100;

/// Loan scenario for a single DSR calculation. Immutable per calculation;
/// every recomputation receives a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub annual_income: Money,
    /// Principal borrowed.
    pub loan_amount: Money,
    /// Nominal annual rate as a percentage (4.5 = 4.5%).
    pub interest_rate: Percent,
    pub loan_term_year: u32,
    /// Interest-only years at the start of the term.
    #[serde(default)]
    pub grace_period_year: u32,
    #[serde(default)]
    pub repayment_method: RepaymentMethod,
    #[serde(default)]
    pub collateral_type: CollateralType,
    /// Add the fixed stress add-on to the rate used for the interest burden.
    #[serde(default)]
    pub apply_stress_dsr: bool,
}

impl LoanParameters {
    pub fn total_months(&self) -> u32 {
        self.loan_term_year.saturating_mul(12)
    }

    pub fn grace_months(&self) -> u32 {
        self.grace_period_year.saturating_mul(12)
    }

    /// True when the grace period covers the whole term, leaving no month
    /// in which principal is repaid.
    pub fn is_degenerate(&self) -> bool {
        self.grace_period_year >= self.loan_term_year
    }

    /// Boundary validation. The numeric core never calls this; it accepts
    /// any finite input and falls back on degenerate values instead.
    pub fn validate(&self) -> DsrResult<()> {
        if self.annual_income < Decimal::ZERO {
            return Err(DsrError::InvalidInput {
                field: "annual_income".into(),
                reason: "Annual income cannot be negative.".into(),
            });
        }
        if self.loan_amount < Decimal::ZERO {
            return Err(DsrError::InvalidInput {
                field: "loan_amount".into(),
                reason: "Loan amount cannot be negative.".into(),
            });
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(DsrError::InvalidInput {
                field: "interest_rate".into(),
                reason: "Interest rate cannot be negative.".into(),
            });
        }
        if self.loan_term_year == 0 {
            return Err(DsrError::InvalidInput {
                field: "loan_term_year".into(),
                reason: "Loan term must be at least 1 year.".into(),
            });
        }
        if self.loan_term_year > MAX_LOAN_TERM_YEAR {
            return Err(DsrError::InvalidInput {
                field: "loan_term_year".into(),
                reason: format!("Loan term cannot exceed {MAX_LOAN_TERM_YEAR} years."),
            });
        }
        if self.is_degenerate() {
            return Err(DsrError::InvalidInput {
                field: "grace_period_year".into(),
                reason: format!(
                    "Grace period ({} years) must be shorter than the loan term ({} years).",
                    self.grace_period_year, self.loan_term_year
                ),
            });
        }
        Ok(())
    }
}
