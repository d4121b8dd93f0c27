//! Fixed-payment debt amortization over the operating years.
//!
//! Sign conventions follow the pro-forma: interest, service, and principal
//! rows are negative (cash out), the outstanding balance is positive.
//! `principal payment = service − interest` is therefore negative, and
//! chaining it onto the balance walks the balance down to zero at the end
//! of the term. Years past the term carry zeros.

use helios_core::SYSTEM_LIFETIME_YEARS;
use serde::{Deserialize, Serialize};

/// Level annual payment for a fully amortizing loan.
///
/// At a zero rate the annuity formula degenerates to straight-line
/// principal repayment.
pub fn annual_debt_payment(principal: f64, annual_rate: f64, term_years: usize) -> f64 {
    if principal == 0.0 {
        return 0.0;
    }
    if annual_rate == 0.0 {
        return principal / term_years as f64;
    }
    let growth = (1.0 + annual_rate).powi(term_years as i32);
    principal * annual_rate * growth / (growth - 1.0)
}

/// Amortization rows for operating years 1..=20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSchedule {
    /// Balance at the start of each operating year, $M (positive).
    pub outstanding_start: [f64; SYSTEM_LIFETIME_YEARS],
    /// Interest accrued each year, $M (negative).
    pub interest: [f64; SYSTEM_LIFETIME_YEARS],
    /// Total debt service each year, $M (negative).
    pub service: [f64; SYSTEM_LIFETIME_YEARS],
    /// Principal portion of the service, $M (negative).
    pub principal_payment: [f64; SYSTEM_LIFETIME_YEARS],
}

impl DebtSchedule {
    pub fn build(principal: f64, annual_rate: f64, term_years: usize) -> Self {
        let mut schedule = Self {
            outstanding_start: [0.0; SYSTEM_LIFETIME_YEARS],
            interest: [0.0; SYSTEM_LIFETIME_YEARS],
            service: [0.0; SYSTEM_LIFETIME_YEARS],
            principal_payment: [0.0; SYSTEM_LIFETIME_YEARS],
        };
        if principal == 0.0 {
            return schedule;
        }

        let payment = annual_debt_payment(principal, annual_rate, term_years);
        let mut balance = principal;
        for index in 0..SYSTEM_LIFETIME_YEARS.min(term_years) {
            schedule.outstanding_start[index] = balance;
            schedule.interest[index] = -balance * annual_rate;
            schedule.service[index] = -payment;
            schedule.principal_payment[index] = schedule.service[index] - schedule.interest[index];
            balance += schedule.principal_payment[index];
        }
        schedule
    }
}
