//! Lease versus buy cost model.
//!
//! Prices the lease path and the buy path over the same horizon, merges the
//! two net cost series month by month and recommends the cheaper option.
//! All validation runs before either series is computed.

pub mod recommendation;
pub mod request;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::buy::schedule::{build_buy_schedule, BuyCostPoint};
use crate::buy::BuyInputs;
use crate::horizon::{HorizonPolicy, LeaseEnd};
use crate::lease::schedule::{build_lease_schedule, LeaseCostPoint};
use crate::lease::LeaseInputs;
use crate::types::{with_metadata, ComputationOutput, Money, Months};
use crate::LeaseBuyResult;

pub use recommendation::{recommend, Recommendation, Winner, TIE_TOLERANCE};
pub use request::{compare_request, parse_request, ComparisonRequest, SimpleInputs};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Fully specified comparison (advanced mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInput {
    /// Omit to price the buy path alone
    #[serde(default)]
    pub lease: Option<LeaseInputs>,
    pub buy: BuyInputs,
    pub horizon_months: Months,
    #[serde(default)]
    pub horizon_policy: HorizonPolicy,
}

/// Both cumulative net costs for one month; the line chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCostPoint {
    pub month: Months,
    pub lease_net_cost: Option<Money>,
    pub buy_net_cost: Money,
}

/// Headline figures for each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub lease_monthly_payment: Option<Money>,
    pub lease_cycles: Option<u32>,
    pub lease_total_fees: Option<Money>,
    pub lease_mileage_penalty: Option<Money>,
    /// Payments over one full lease term, regardless of horizon
    pub lease_total_payments_term: Option<Money>,
    /// Net cost of one complete lease through turn-in
    pub lease_full_term_cost: Option<Money>,
    pub buy_monthly_payment: Money,
    pub total_purchase_cost: Money,
    pub financed_principal: Money,
    pub total_interest_paid: Money,
    pub value_at_horizon: Money,
    pub equity_at_horizon: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub horizon_months: Months,
    pub recommendation: Recommendation,
    pub summary: ComparisonSummary,
    pub series: Vec<MonthlyCostPoint>,
    /// Empty when no lease was supplied
    pub lease_series: Vec<LeaseCostPoint>,
    pub buy_series: Vec<BuyCostPoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare leasing against buying over `input.horizon_months`.
pub fn compare(input: &ComparisonInput) -> LeaseBuyResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation ----------------------------------------------------------
    validate_input(input)?;
    let horizon = input.horizon_months;

    // -- Lease path ------------------------------------------------------------
    let lease_end = input
        .horizon_policy
        .lease_end()
        .unwrap_or(LeaseEnd::WalkAway);
    let lease_schedule = input
        .lease
        .as_ref()
        .map(|lease| build_lease_schedule(lease, horizon, lease_end))
        .transpose()?;

    let lease_total_payments_term = input
        .lease
        .as_ref()
        .map(LeaseInputs::total_payments_over_term)
        .transpose()?;
    let lease_full_term_cost = input
        .lease
        .as_ref()
        .map(LeaseInputs::full_term_cost)
        .transpose()?;

    // -- Buy path --------------------------------------------------------------
    let buy_schedule = build_buy_schedule(&input.buy, horizon)?;

    // -- Warnings ----------------------------------------------------------------
    if let (Some(lease), Some(schedule)) = (&input.lease, &lease_schedule) {
        if horizon < lease.term_months {
            warnings.push(format!(
                "Horizon ends before the {}-month lease term; a full cycle of lease fees is charged within it.",
                lease.term_months
            ));
        }
        if schedule.leased_months < horizon {
            warnings.push(format!(
                "Lease returned after month {}; no vehicle for the remaining {} months.",
                schedule.leased_months,
                horizon - schedule.leased_months
            ));
        }
        if schedule.total_mileage_penalty > Decimal::ZERO {
            warnings.push(format!(
                "Anticipated mileage exceeds the allowance by {} miles per year.",
                lease.mileage.annual_excess_miles()
            ));
        }
    }
    if horizon > input.buy.loan_term_months {
        warnings.push(format!(
            "Loan is paid off at month {}; the car is kept with no payments afterwards.",
            input.buy.loan_term_months
        ));
    }
    if buy_schedule.equity_at_horizon < Decimal::ZERO {
        warnings.push("Loan balance exceeds the car's value at the horizon (negative equity).".into());
    }

    // -- Merge & recommend -------------------------------------------------------
    let lease_points: Vec<LeaseCostPoint> = lease_schedule
        .as_ref()
        .map(|s| s.points.clone())
        .unwrap_or_default();

    let series: Vec<MonthlyCostPoint> = buy_schedule
        .points
        .iter()
        .enumerate()
        .map(|(idx, buy)| MonthlyCostPoint {
            month: buy.month,
            lease_net_cost: lease_points.get(idx).map(|l| l.net_cost),
            buy_net_cost: buy.net_cost,
        })
        .collect();

    let final_lease_cost = lease_points.last().map(|p| p.net_cost);
    let final_buy_cost = buy_schedule
        .points
        .last()
        .map(|p| p.net_cost)
        .unwrap_or(Decimal::ZERO);
    let recommendation = recommend(final_lease_cost, final_buy_cost, horizon);

    tracing::debug!(
        horizon,
        winner = %recommendation.winner,
        final_buy_cost = %final_buy_cost,
        final_lease_cost = ?final_lease_cost,
        "comparison complete"
    );

    let summary = ComparisonSummary {
        lease_monthly_payment: lease_schedule.as_ref().map(|s| s.monthly_payment),
        lease_cycles: lease_schedule.as_ref().map(|s| s.cycles),
        lease_total_fees: lease_schedule.as_ref().map(|s| s.total_fees),
        lease_mileage_penalty: lease_schedule.as_ref().map(|s| s.total_mileage_penalty),
        lease_total_payments_term,
        lease_full_term_cost,
        buy_monthly_payment: buy_schedule.monthly_payment,
        total_purchase_cost: buy_schedule.purchase.total_purchase_cost,
        financed_principal: buy_schedule.purchase.financed_principal,
        total_interest_paid: buy_schedule.total_interest_paid,
        value_at_horizon: buy_schedule.value_at_horizon,
        equity_at_horizon: buy_schedule.equity_at_horizon,
    };

    let output = ComparisonOutput {
        horizon_months: horizon,
        recommendation,
        summary,
        series,
        lease_series: lease_points,
        buy_series: buy_schedule.points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "net_cost": "cash paid to date less equity held (lease equity is zero)",
        "loan_rate": "apr / 12, level payment, final payment trued up",
        "lease_payment": "(cap - residual) / term + (cap + residual) * money factor",
        "lease_fees": "spread evenly over the leased months in the horizon",
        "mileage_penalty": "accrues monthly on miles over the allowance",
        "horizon_policy": input.horizon_policy,
        "tie_tolerance": TIE_TOLERANCE.to_string(),
        "percent_difference": "ratio of the gap to the larger final cost (0.25 = 25%)",
    });

    Ok(with_metadata(
        "Lease vs buy net cost comparison",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ComparisonInput) -> LeaseBuyResult<()> {
    input.horizon_policy.check(
        input.horizon_months,
        input.lease.as_ref().map(|l| l.term_months),
        input.buy.loan_term_months,
    )?;
    if let Some(lease) = &input.lease {
        lease.validate()?;
    }
    input.buy.validate()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
