use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortization::MONTHS_PER_YEAR;
use super::schedule::MonthlyPaymentEntry;
use crate::types::*;

/// One loan year of the actual schedule; the series charts are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    /// 1-based loan year
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub closing_balance: Money,
}

/// Roll monthly entries up into loan years. A trailing partial year is
/// still reported.
pub fn summarize_by_year(entries: &[MonthlyPaymentEntry]) -> Vec<YearlySummary> {
    entries
        .chunks(MONTHS_PER_YEAR as usize)
        .zip(1u32..)
        .map(|(months, year)| {
            let mut principal_paid = Decimal::ZERO;
            let mut interest_paid = Decimal::ZERO;
            let mut total_paid = Decimal::ZERO;
            for m in months {
                principal_paid += m.principal;
                interest_paid += m.interest;
                total_paid += m.payment;
            }
            YearlySummary {
                year,
                principal_paid,
                interest_paid,
                total_paid,
                closing_balance: months.last().map(|m| m.balance).unwrap_or_default(),
            }
        })
        .collect()
}
