use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::buy::loan::{self, AmortizationRow};
use crate::buy::{BuyInputs, PurchaseBreakdown};
use crate::types::{Money, Months};
use crate::validation::horizon_in_range;
use crate::LeaseBuyResult;

/// One month of the buy cost series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyCostPoint {
    /// Month number (1-indexed)
    pub month: Months,
    /// Loan payment made this month (zero once the loan is paid off)
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub remaining_balance: Money,
    pub market_value: Money,
    /// Market value less remaining balance
    pub equity: Money,
    /// Upfront cash plus every loan payment to date
    pub cumulative_cash_out: Money,
    /// Cumulative cash out less current equity
    pub net_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuySchedule {
    pub purchase: PurchaseBreakdown,
    pub monthly_payment: Money,
    pub total_interest_paid: Money,
    pub value_at_horizon: Money,
    pub equity_at_horizon: Money,
    pub points: Vec<BuyCostPoint>,
}

/// Build the cumulative buy cost series over `horizon_months`.
///
/// Past the loan term the owner keeps the car: no payments, zero balance,
/// and the value keeps following the depreciation curve.
pub fn build_buy_schedule(buy: &BuyInputs, horizon_months: Months) -> LeaseBuyResult<BuySchedule> {
    horizon_in_range(horizon_months)?;
    buy.validate()?;
    let purchase = buy.purchase_breakdown();

    let monthly_payment =
        loan::loan_payment(purchase.financed_principal, buy.apr, buy.loan_term_months)?;
    let amortization =
        loan::amortization_schedule(purchase.financed_principal, buy.apr, buy.loan_term_months)?;
    let values = buy.depreciation.value_path(buy.vehicle_price, horizon_months);

    let mut points = Vec::with_capacity(horizon_months as usize);
    let mut cumulative_cash_out = purchase.upfront_cash;
    let mut total_interest_paid = Decimal::ZERO;

    for (idx, market_value) in values.into_iter().enumerate() {
        let month = idx as Months + 1;
        let (payment, interest, principal, remaining_balance) = match amortization.get(idx) {
            Some(AmortizationRow {
                payment,
                interest,
                principal,
                ending_balance,
                ..
            }) => (*payment, *interest, *principal, *ending_balance),
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        cumulative_cash_out += payment;
        total_interest_paid += interest;
        let equity = market_value - remaining_balance;

        points.push(BuyCostPoint {
            month,
            payment,
            interest,
            principal,
            remaining_balance,
            market_value,
            equity,
            cumulative_cash_out,
            net_cost: cumulative_cash_out - equity,
        });
    }

    let (value_at_horizon, equity_at_horizon) = points
        .last()
        .map(|p| (p.market_value, p.equity))
        .unwrap_or((buy.vehicle_price, buy.vehicle_price - purchase.financed_principal));

    tracing::debug!(
        principal = %purchase.financed_principal,
        %monthly_payment,
        %value_at_horizon,
        %equity_at_horizon,
        "buy schedule built"
    );

    Ok(BuySchedule {
        purchase,
        monthly_payment,
        total_interest_paid,
        value_at_horizon,
        equity_at_horizon,
        points,
    })
}
