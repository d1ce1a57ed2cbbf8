use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::horizon::LeaseEnd;
use crate::lease::LeaseInputs;
use crate::types::{Money, Months};
use crate::validation::horizon_in_range;
use crate::LeaseBuyResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// One month of the lease cost series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseCostPoint {
    /// Month number (1-indexed)
    pub month: Months,
    /// Lease payment made this month (zero after walking away)
    pub payment: Money,
    pub cumulative_payments: Money,
    /// Cash paid at signing, summed over every lease cycle started so far
    pub upfront_cash: Money,
    pub fees_accrued: Money,
    pub mileage_penalty_accrued: Money,
    /// Cumulative net cost; a lease carries no equity
    pub net_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseSchedule {
    pub monthly_payment: Money,
    /// Lease cycles started within the horizon
    pub cycles: u32,
    /// Months spent under a lease within the horizon
    pub leased_months: Months,
    pub total_fees: Money,
    pub total_mileage_penalty: Money,
    pub points: Vec<LeaseCostPoint>,
}

/// Build the cumulative lease cost series over `horizon_months`.
///
/// Fees for every cycle are spread evenly over the leased months; the excess
/// mileage penalty accrues per month driven under the lease.
pub fn build_lease_schedule(
    lease: &LeaseInputs,
    horizon_months: Months,
    lease_end: LeaseEnd,
) -> LeaseBuyResult<LeaseSchedule> {
    horizon_in_range(horizon_months)?;
    lease.validate()?;
    let monthly_payment = lease.monthly_payment()?;
    let term = lease.term_months;

    let (cycles, leased_months) = match lease_end {
        LeaseEnd::Renew => (horizon_months.div_ceil(term), horizon_months),
        LeaseEnd::WalkAway => (1, horizon_months.min(term)),
    };
    let total_fees = lease.fees_per_cycle() * Decimal::from(cycles);
    let penalty_per_month = Decimal::from(lease.mileage.annual_excess_miles())
        * lease.mileage.excess_mile_rate
        / MONTHS_PER_YEAR;

    let mut points = Vec::with_capacity(horizon_months as usize);
    let mut upfront_cash = Decimal::ZERO;
    let mut cumulative_payments = Decimal::ZERO;
    let mut months_leased = 0u32;

    for month in 1..=horizon_months {
        let active = month <= leased_months;
        let payment = if active {
            if (month - 1) % term == 0 {
                upfront_cash += lease.upfront_cash();
            }
            months_leased += 1;
            monthly_payment
        } else {
            Decimal::ZERO
        };
        cumulative_payments += payment;

        let fees_accrued = if leased_months == 0 {
            Decimal::ZERO
        } else {
            total_fees * Decimal::from(months_leased) / Decimal::from(leased_months)
        };
        let mileage_penalty_accrued = penalty_per_month * Decimal::from(months_leased);

        points.push(LeaseCostPoint {
            month,
            payment,
            cumulative_payments,
            upfront_cash,
            fees_accrued,
            mileage_penalty_accrued,
            net_cost: upfront_cash + cumulative_payments + fees_accrued + mileage_penalty_accrued,
        });
    }

    let total_mileage_penalty = penalty_per_month * Decimal::from(leased_months);

    tracing::debug!(
        %monthly_payment,
        cycles,
        leased_months,
        %total_fees,
        %total_mileage_penalty,
        "lease schedule built"
    );

    Ok(LeaseSchedule {
        monthly_payment,
        cycles,
        leased_months,
        total_fees,
        total_mileage_penalty,
        points,
    })
}
