//! Market value of the purchased vehicle over time.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, Rate};
use crate::validation::{invalid, non_negative};
use crate::LeaseBuyResult;

const NEWTON_ITERATIONS: u32 = 30;
const MONTHS_PER_YEAR: u32 = 12;

/// Decline of market value from the purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DepreciationCurve {
    /// Declining balance: loses `annual_rate` of its value each year,
    /// compounded monthly.
    Exponential { annual_rate: Rate },
    /// Loses `annual_rate` of the purchase price each year, floored at zero.
    StraightLine { annual_rate: Rate },
    /// Linear decline to an anticipated resale / trade-in value at the end
    /// of the horizon.
    ResaleTarget { resale_value: Money },
}

impl DepreciationCurve {
    pub fn validate(&self) -> LeaseBuyResult<()> {
        match self {
            DepreciationCurve::Exponential { annual_rate }
            | DepreciationCurve::StraightLine { annual_rate } => {
                non_negative("buy.depreciation.annual_rate", *annual_rate)?;
                if *annual_rate > Decimal::ONE {
                    return Err(invalid(
                        "buy.depreciation.annual_rate",
                        "Annual depreciation cannot exceed 100%",
                    ));
                }
                Ok(())
            }
            DepreciationCurve::ResaleTarget { resale_value } => {
                non_negative("buy.depreciation.resale_value", *resale_value)
            }
        }
    }

    /// Market value at the end of each month `1..=horizon_months`.
    pub fn value_path(&self, purchase_price: Money, horizon_months: Months) -> Vec<Money> {
        let mut values = Vec::with_capacity(horizon_months as usize);
        let mut value = purchase_price;

        match self {
            DepreciationCurve::Exponential { annual_rate } => {
                let monthly_factor = nth_root(Decimal::ONE - *annual_rate, MONTHS_PER_YEAR);
                for _ in 0..horizon_months {
                    value *= monthly_factor;
                    values.push(value);
                }
            }
            DepreciationCurve::StraightLine { annual_rate } => {
                let monthly_drop =
                    purchase_price * *annual_rate / Decimal::from(MONTHS_PER_YEAR);
                for _ in 0..horizon_months {
                    value = (value - monthly_drop).max(Decimal::ZERO);
                    values.push(value);
                }
            }
            DepreciationCurve::ResaleTarget { resale_value } => {
                let span = Decimal::from(horizon_months.max(1));
                for month in 1..=horizon_months {
                    value = purchase_price
                        + (*resale_value - purchase_price) * Decimal::from(month) / span;
                    values.push(value);
                }
            }
        }

        values
    }
}

/// Newton's method for the nth root of A.
/// x_{k+1} = ((n-1)*x_k + A / x_k^(n-1)) / n
fn nth_root(a: Decimal, n: u32) -> Decimal {
    if a <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if a == Decimal::ONE {
        return Decimal::ONE;
    }
    let n_dec = Decimal::from(n);
    let n_minus_1 = n_dec - Decimal::ONE;

    let mut x = a;
    if a > dec!(0.5) && a < dec!(2.0) {
        x = Decimal::ONE + (a - Decimal::ONE) / n_dec;
    }

    for _ in 0..NEWTON_ITERATIONS {
        let mut x_pow = Decimal::ONE;
        for _ in 0..(n - 1) {
            x_pow *= x;
        }
        if x_pow.is_zero() {
            break;
        }
        let x_new = (n_minus_1 * x + a / x_pow) / n_dec;
        if (x_new - x).abs() < dec!(0.0000000000001) {
            return x_new;
        }
        x = x_new;
    }
    x
}
