use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{round_cents, Money, Months, Rate};

/// Final costs closer than this are reported as a tie.
pub const TIE_TOLERANCE: Money = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Lease,
    Buy,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Winner::Lease => "lease",
            Winner::Buy => "buy",
            Winner::Tie => "tie",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub winner: Winner,
    /// Absent when only the buy path was priced
    pub final_lease_cost: Option<Money>,
    pub final_buy_cost: Money,
    /// Absolute gap between the two final net costs
    pub difference: Money,
    /// `difference` as a share of the larger cost magnitude (0.12 = 12%)
    pub percent_difference: Rate,
    pub message: String,
}

/// Pick the cheaper option at the horizon.
pub fn recommend(
    final_lease_cost: Option<Money>,
    final_buy_cost: Money,
    horizon_months: Months,
) -> Recommendation {
    let Some(lease_cost) = final_lease_cost else {
        return Recommendation {
            winner: Winner::Buy,
            final_lease_cost: None,
            final_buy_cost,
            difference: Decimal::ZERO,
            percent_difference: Decimal::ZERO,
            message: format!(
                "No lease was priced; buying costs about ${} net over {} months.",
                round_cents(final_buy_cost).round(),
                horizon_months
            ),
        };
    };

    let difference = (final_buy_cost - lease_cost).abs();
    let base = lease_cost.abs().max(final_buy_cost.abs());
    let percent_difference = if base.is_zero() {
        Decimal::ZERO
    } else {
        difference / base
    };

    let winner = if difference < TIE_TOLERANCE {
        Winner::Tie
    } else if lease_cost < final_buy_cost {
        Winner::Lease
    } else {
        Winner::Buy
    };

    let message = match winner {
        Winner::Tie => format!(
            "Leasing and buying are effectively equal over {} months under these assumptions.",
            horizon_months
        ),
        Winner::Lease => format!(
            "Leasing is cheaper by approximately ${} over {} months under these assumptions.",
            difference.round(),
            horizon_months
        ),
        Winner::Buy => format!(
            "Buying is cheaper by approximately ${} over {} months under these assumptions.",
            difference.round(),
            horizon_months
        ),
    };

    Recommendation {
        winner,
        final_lease_cost: Some(lease_cost),
        final_buy_cost,
        difference,
        percent_difference,
        message,
    }
}
