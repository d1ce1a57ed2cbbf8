//! Fixed-rate auto loan amortization.
//!
//! The schedule is an explicit recurrence over the balance: each month
//! accrues interest on the opening balance, the level payment covers that
//! interest and the rest retires principal. The final payment is trued up so
//! the loan closes at exactly zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::defaults::{MAX_APR, MAX_LOAN_TERM_MONTHS};
use crate::error::LeaseBuyError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Rate};
use crate::validation::{at_most, non_negative, positive_term};
use crate::LeaseBuyResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual rate as a decimal (0.05 = 5%)
    pub apr: Rate,
    pub term_months: Months,
    /// Include the month-by-month schedule in the output
    #[serde(default)]
    pub include_schedule: bool,
}

/// A single row in the loan amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed)
    pub month: Months,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

pub fn monthly_rate(apr: Rate) -> Rate {
    apr / MONTHS_PER_YEAR
}

/// Level monthly payment: `P * r / (1 - (1+r)^-n)`, or `P / n` when the
/// rate is zero.
pub fn loan_payment(principal: Money, apr: Rate, term_months: Months) -> LeaseBuyResult<Money> {
    positive_term("term_months", term_months)?;
    if term_months > MAX_LOAN_TERM_MONTHS {
        return Err(LeaseBuyError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Loan term cannot exceed {MAX_LOAN_TERM_MONTHS} months, got {term_months}"),
        });
    }
    non_negative("principal", principal)?;
    non_negative("apr", apr)?;
    at_most("apr", apr, MAX_APR, "APR is a decimal rate (0.05 = 5%) and cannot exceed 1")?;
    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let payment = time_value::pmt(monthly_rate(apr), term_months, principal, Decimal::ZERO)
        .map_err(|e| rename_rate_field(e, "apr"))?;
    Ok(-payment)
}

/// Closed-form balance after `months_elapsed` payments, clamped to the term.
pub fn remaining_balance(
    principal: Money,
    apr: Rate,
    term_months: Months,
    months_elapsed: Months,
) -> LeaseBuyResult<Money> {
    let payment = loan_payment(principal, apr, term_months)?;
    let elapsed = months_elapsed.min(term_months);
    let balance = -time_value::fv(monthly_rate(apr), elapsed, -payment, principal)
        .map_err(|e| rename_rate_field(e, "apr"))?;
    Ok(balance.max(Decimal::ZERO))
}

/// Report a range error from the annuity maths against the caller's field.
fn rename_rate_field(err: LeaseBuyError, field: &str) -> LeaseBuyError {
    match err {
        LeaseBuyError::InvalidInput { reason, .. } => LeaseBuyError::InvalidInput {
            field: field.into(),
            reason,
        },
        other => other,
    }
}

/// Full amortization schedule for the loan term.
pub fn amortization_schedule(
    principal: Money,
    apr: Rate,
    term_months: Months,
) -> LeaseBuyResult<Vec<AmortizationRow>> {
    let payment = loan_payment(principal, apr, term_months)?;
    let rate = monthly_rate(apr);

    let mut schedule = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let beginning_balance = balance;
        let interest = beginning_balance * rate;
        let (payment, principal_paid) = if month == term_months {
            (interest + beginning_balance, beginning_balance)
        } else {
            (payment, payment - interest)
        };
        balance = beginning_balance - principal_paid;

        schedule.push(AmortizationRow {
            month,
            beginning_balance,
            payment,
            interest,
            principal: principal_paid,
            ending_balance: balance,
        });
    }

    Ok(schedule)
}

/// Standalone loan calculator: payment, totals and optional schedule.
pub fn calculate_loan(input: &LoanInput) -> LeaseBuyResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let monthly_payment = loan_payment(input.principal, input.apr, input.term_months)?;
    let schedule = amortization_schedule(input.principal, input.apr, input.term_months)?;

    let total_paid: Money = schedule.iter().map(|r| r.payment).sum();
    let total_interest: Money = schedule.iter().map(|r| r.interest).sum();

    if input.apr.is_zero() {
        warnings.push("APR is zero; payment is principal divided by term.".into());
    }

    let output = LoanOutput {
        monthly_payment,
        total_paid,
        total_interest,
        schedule: input.include_schedule.then_some(schedule),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly, apr / 12",
        "final_payment": "trued up to close the balance at zero"
    });

    Ok(with_metadata(
        "Fixed-rate amortizing loan",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
