use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amortization::{AmortizationContext, AmortizationStep};
use super::params::LoanParameters;
use crate::types::*;

/// Percentage points added to the nominal rate for the stress pass.
pub const STRESS_RATE_ADD_ON: Percent = dec!(3.0);

/// A single month of the displayed repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaymentEntry {
    /// 1-based month index
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Outstanding balance after this month's payment
    pub balance: Money,
}

/// The contracted schedule at the nominal rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualSchedule {
    pub rate_used: Percent,
    pub monthly_payments: Vec<MonthlyPaymentEntry>,
    pub total_interest: Money,
    pub total_payment: Money,
}

/// Totals of the stress pass. Its months are never exposed; only the
/// interest it accrues feeds the ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressSchedule {
    pub stress_rate_used: Percent,
    pub total_stress_interest: Money,
}

/// Rate the stress pass runs at: the nominal rate, plus the add-on when
/// stress testing is requested.
pub fn stress_rate(params: &LoanParameters) -> Percent {
    if params.apply_stress_dsr {
        params.interest_rate + STRESS_RATE_ADD_ON
    } else {
        params.interest_rate
    }
}

/// Walk every month of the term at `annual_rate`, handing each step to
/// `visit`. Returns (total interest, total payment).
fn run_pass<F>(params: &LoanParameters, annual_rate: Percent, mut visit: F) -> (Money, Money)
where
    F: FnMut(u32, &AmortizationStep),
{
    let ctx = AmortizationContext::new(
        params.loan_amount,
        annual_rate,
        params.total_months(),
        params.grace_months(),
        params.repayment_method,
    );

    let mut balance = params.loan_amount;
    let mut total_interest = Decimal::ZERO;
    let mut total_payment = Decimal::ZERO;

    for month in 1..=ctx.total_months {
        let step = ctx.step(balance, month);
        total_interest += step.interest;
        total_payment += step.payment;
        balance = step.balance;
        visit(month, &step);
    }

    (total_interest, total_payment)
}

/// Month-by-month schedule at the nominal rate, for display.
pub fn generate_actual_schedule(params: &LoanParameters) -> ActualSchedule {
    let mut monthly_payments = Vec::with_capacity(params.total_months() as usize);

    let (total_interest, total_payment) =
        run_pass(params, params.interest_rate, |month, step| {
            monthly_payments.push(MonthlyPaymentEntry {
                month,
                payment: step.payment,
                principal: step.principal,
                interest: step.interest,
                balance: step.balance,
            });
        });

    tracing::debug!(
        months = monthly_payments.len(),
        total_interest = %total_interest,
        total_payment = %total_payment,
        "actual schedule generated"
    );

    ActualSchedule {
        rate_used: params.interest_rate,
        monthly_payments,
        total_interest,
        total_payment,
    }
}

/// Same pass at the stress rate; keeps only the accumulated interest.
pub fn generate_stress_schedule(params: &LoanParameters) -> StressSchedule {
    let rate = stress_rate(params);
    let (total_stress_interest, _) = run_pass(params, rate, |_, _| {});

    tracing::debug!(
        stress_rate = %rate,
        total_stress_interest = %total_stress_interest,
        "stress schedule generated"
    );

    StressSchedule {
        stress_rate_used: rate,
        total_stress_interest,
    }
}
