use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::defaults::MONEY_FACTOR_DIVISOR;
use crate::types::{with_metadata, ComputationOutput, Money, Months, Rate};
use crate::validation::{invalid, non_negative, positive_term};
use crate::LeaseBuyResult;

/// Standalone input for the lease payment calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeasePaymentInput {
    /// Cap cost after any cap cost reduction.
    pub adjusted_cap_cost: Money,
    pub residual_value: Money,
    pub money_factor: Rate,
    pub term_months: Months,
}

/// Monthly lease payment split into its two components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeasePaymentBreakdown {
    /// (cap cost - residual) / term
    pub depreciation_fee: Money,
    /// (cap cost + residual) * money factor
    pub finance_fee: Money,
    /// Depreciation fee plus finance fee, before any tax on the payment.
    pub base_payment: Money,
    /// Money factor restated as an APR.
    pub equivalent_apr: Rate,
}

/// Monthly lease payment from the standard money-factor formula.
pub fn lease_payment(
    adjusted_cap_cost: Money,
    residual_value: Money,
    money_factor: Rate,
    term_months: Months,
) -> LeaseBuyResult<LeasePaymentBreakdown> {
    positive_term("term_months", term_months)?;
    non_negative("adjusted_cap_cost", adjusted_cap_cost)?;
    non_negative("residual_value", residual_value)?;
    non_negative("money_factor", money_factor)?;
    if residual_value > adjusted_cap_cost {
        return Err(invalid(
            "residual_value",
            "Residual value cannot exceed the adjusted cap cost",
        ));
    }

    let depreciation_fee = (adjusted_cap_cost - residual_value) / Decimal::from(term_months);
    let finance_fee = (adjusted_cap_cost + residual_value) * money_factor;

    Ok(LeasePaymentBreakdown {
        depreciation_fee,
        finance_fee,
        base_payment: depreciation_fee + finance_fee,
        equivalent_apr: money_factor_to_apr(money_factor),
    })
}

/// Standalone lease calculator: payment breakdown in the standard envelope.
pub fn calculate_lease_payment(
    input: &LeasePaymentInput,
) -> LeaseBuyResult<ComputationOutput<LeasePaymentBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let breakdown = lease_payment(
        input.adjusted_cap_cost,
        input.residual_value,
        input.money_factor,
        input.term_months,
    )?;

    if input.money_factor.is_zero() {
        warnings.push("Money factor is zero; payment is depreciation only.".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "depreciation_fee": "(adjusted cap cost - residual) / term",
        "finance_fee": "(adjusted cap cost + residual) * money factor",
        "equivalent_apr": "money factor * 24",
        "payment_tax": "not applied",
    });

    Ok(with_metadata(
        "Money factor lease payment",
        &assumptions,
        warnings,
        elapsed,
        breakdown,
    ))
}

/// Decimal APR to money factor (0.03 -> 0.00125).
pub fn apr_to_money_factor(apr: Rate) -> Rate {
    apr / MONEY_FACTOR_DIVISOR
}

pub fn money_factor_to_apr(money_factor: Rate) -> Rate {
    money_factor * MONEY_FACTOR_DIVISOR
}
