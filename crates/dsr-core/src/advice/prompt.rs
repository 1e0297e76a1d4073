use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::dsr::engine::CalculationResult;
use crate::dsr::params::LoanParameters;
use crate::types::*;

/// Prompt handed to an external text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvicePrompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = "You are a loan advisor. Given a borrower's loan scenario and its \
debt service ratio, reply in markdown with a short assessment of the repayment burden and \
two or three concrete suggestions. The ratio is an illustrative estimate, not a certified figure.";

fn method_label(method: RepaymentMethod) -> &'static str {
    match method {
        RepaymentMethod::EqualInstallment => "equal installment",
        RepaymentMethod::EqualPrincipal => "equal principal",
    }
}

fn collateral_label(collateral: CollateralType) -> &'static str {
    match collateral {
        CollateralType::Housing => "housing",
        CollateralType::Other => "other",
    }
}

impl AdvicePrompt {
    pub fn build(params: &LoanParameters, result: &CalculationResult) -> Self {
        let mut user = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(user, "## Loan scenario");
        let _ = writeln!(user, "- Annual income: {}", params.annual_income.round_dp(0));
        let _ = writeln!(user, "- Loan amount: {}", params.loan_amount.round_dp(0));
        let _ = writeln!(user, "- Interest rate: {}%", params.interest_rate);
        let _ = writeln!(user, "- Term: {} years", params.loan_term_year);
        let _ = writeln!(user, "- Grace period: {} years", params.grace_period_year);
        let _ = writeln!(user, "- Repayment: {}", method_label(params.repayment_method));
        let _ = writeln!(user, "- Collateral: {}", collateral_label(params.collateral_type));
        let _ = writeln!(
            user,
            "- Stress DSR: {}",
            if params.apply_stress_dsr { "applied" } else { "not applied" }
        );
        let _ = writeln!(user);
        let _ = writeln!(user, "## Result");
        let _ = writeln!(user, "- DSR: {}%", result.dsr_ratio.round_dp(2));
        let _ = writeln!(
            user,
            "- Average monthly payment: {}",
            result.avg_monthly_payment.round_dp(0)
        );
        let _ = writeln!(user, "- Total interest: {}", result.total_interest.round_dp(0));
        let _ = writeln!(user, "- Rate used for stress test: {}%", result.stress_dsr_rate_used);

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    /// System and user parts joined, for services that take one text body.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}
