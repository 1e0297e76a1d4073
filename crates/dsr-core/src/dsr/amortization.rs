use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert a nominal annual percentage into a monthly decimal rate
/// (4.5 -> 0.00375).
pub fn monthly_rate(annual_rate: Percent) -> Decimal {
    annual_rate / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Level annuity payment that repays `principal` over `periods` months at
/// `rate` per month: `P·r·(1+r)^n / ((1+r)^n - 1)`.
///
/// Zero periods pay nothing. A zero rate degenerates to straight-line
/// `P / n`. When `(1+r)^n` leaves the decimal range the payment converges
/// to its limit `P·r`.
pub fn fixed_installment(principal: Money, rate: Decimal, periods: i64) -> Money {
    if periods <= 0 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(periods);
    if rate.is_zero() {
        return principal / n;
    }
    match (Decimal::ONE + rate).checked_powi(periods) {
        Some(growth) if growth != Decimal::ONE => {
            principal * rate * (growth / (growth - Decimal::ONE))
        }
        Some(_) => principal / n,
        None => principal * rate,
    }
}

/// One month of the amortisation model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationStep {
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Balance carried into the next month, floored at zero.
    pub balance: Money,
}

/// Everything a single pass needs to step month by month. Built once per
/// pass so the annuity payment and the equal-principal share are computed
/// up front.
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationContext {
    pub original_principal: Money,
    pub monthly_rate: Decimal,
    pub total_months: u32,
    pub grace_months: u32,
    pub method: RepaymentMethod,
    fixed_payment: Money,
    principal_share: Money,
}

impl AmortizationContext {
    pub fn new(
        original_principal: Money,
        annual_rate: Percent,
        total_months: u32,
        grace_months: u32,
        method: RepaymentMethod,
    ) -> Self {
        let rate = monthly_rate(annual_rate);
        let n = i64::from(total_months) - i64::from(grace_months);

        // Both are keyed to the original principal over the full amortising
        // span; neither is re-derived from the balance after grace.
        let (fixed_payment, principal_share) = match method {
            RepaymentMethod::EqualInstallment => {
                (fixed_installment(original_principal, rate, n), Decimal::ZERO)
            }
            RepaymentMethod::EqualPrincipal => {
                let share = if n > 0 {
                    original_principal / Decimal::from(n)
                } else {
                    Decimal::ZERO
                };
                (Decimal::ZERO, share)
            }
        };

        Self {
            original_principal,
            monthly_rate: rate,
            total_months,
            grace_months,
            method,
            fixed_payment,
            principal_share,
        }
    }

    /// Months in which principal is repaid. Non-positive when the grace
    /// period covers the whole term.
    pub fn amortizing_months(&self) -> i64 {
        i64::from(self.total_months) - i64::from(self.grace_months)
    }

    /// Level payment used after grace under equal installments.
    pub fn fixed_payment(&self) -> Money {
        self.fixed_payment
    }

    /// Constant principal portion used after grace under equal principal.
    pub fn principal_share(&self) -> Money {
        self.principal_share
    }

    /// Produce month `month` (1-based) given the balance outstanding at its
    /// start.
    pub fn step(&self, balance: Money, month: u32) -> AmortizationStep {
        let interest = balance * self.monthly_rate;

        if month <= self.grace_months {
            return AmortizationStep {
                payment: interest,
                principal: Decimal::ZERO,
                interest,
                balance,
            };
        }

        let (principal, payment) = match self.method {
            RepaymentMethod::EqualPrincipal => {
                (self.principal_share, self.principal_share + interest)
            }
            RepaymentMethod::EqualInstallment => (self.fixed_payment - interest, self.fixed_payment),
        };

        AmortizationStep {
            payment,
            principal,
            interest,
            balance: (balance - principal).max(Decimal::ZERO),
        }
    }
}
