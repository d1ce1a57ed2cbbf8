//! Buy path: purchase costs, loan amortization, depreciation, and the
//! month-by-month net cost series (cash out less equity).

pub mod depreciation;
pub mod loan;
pub mod schedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::defaults::{MAX_APR, MAX_LOAN_TERM_MONTHS, MIN_LOAN_TERM_MONTHS};
use crate::types::{Money, Months, Rate};
use crate::validation::{at_most, invalid, non_negative, term_between};
use crate::LeaseBuyResult;

pub use depreciation::DepreciationCurve;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyInputs {
    /// Negotiated price before tax
    pub vehicle_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    /// Loan APR as a decimal (0.05 = 5%)
    pub apr: Rate,
    pub loan_term_months: Months,
    pub depreciation: DepreciationCurve,
    #[serde(default)]
    pub sales_tax_rate: Rate,
    /// Doc, title and registration fees
    #[serde(default)]
    pub fees: Money,
    /// Roll tax and fees into the loan instead of paying them at signing
    #[serde(default = "default_true")]
    pub finance_taxes_and_fees: bool,
}

/// What the purchase costs before any loan payment is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseBreakdown {
    /// Price plus fees; sales tax applies to this amount
    pub taxable_amount: Money,
    pub sales_tax: Money,
    pub total_purchase_cost: Money,
    pub financed_principal: Money,
    /// Down payment, plus tax and fees when they are not financed
    pub upfront_cash: Money,
}

impl BuyInputs {
    pub fn purchase_breakdown(&self) -> PurchaseBreakdown {
        let taxable_amount = self.vehicle_price + self.fees;
        let sales_tax = taxable_amount * self.sales_tax_rate;
        let total_purchase_cost = taxable_amount + sales_tax;

        let (financed_principal, upfront_cash) = if self.finance_taxes_and_fees {
            (total_purchase_cost - self.down_payment, self.down_payment)
        } else {
            (
                self.vehicle_price - self.down_payment,
                self.down_payment + sales_tax + self.fees,
            )
        };

        PurchaseBreakdown {
            taxable_amount,
            sales_tax,
            total_purchase_cost,
            financed_principal: financed_principal.max(Decimal::ZERO),
            upfront_cash,
        }
    }

    pub fn validate(&self) -> LeaseBuyResult<()> {
        non_negative("buy.vehicle_price", self.vehicle_price)?;
        non_negative("buy.down_payment", self.down_payment)?;
        non_negative("buy.apr", self.apr)?;
        at_most(
            "buy.apr",
            self.apr,
            MAX_APR,
            "APR is a decimal rate (0.05 = 5%) and cannot exceed 1",
        )?;
        non_negative("buy.sales_tax_rate", self.sales_tax_rate)?;
        non_negative("buy.fees", self.fees)?;
        term_between(
            "buy.loan_term_months",
            self.loan_term_months,
            MIN_LOAN_TERM_MONTHS,
            MAX_LOAN_TERM_MONTHS,
        )?;
        self.depreciation.validate()?;

        let ceiling = if self.finance_taxes_and_fees {
            self.purchase_breakdown().total_purchase_cost
        } else {
            self.vehicle_price
        };
        if self.down_payment > ceiling {
            return Err(invalid(
                "buy.down_payment",
                "Down payment cannot exceed the amount being paid for",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy() -> BuyInputs {
        BuyInputs {
            vehicle_price: dec!(35000),
            down_payment: dec!(5000),
            apr: dec!(0.05),
            loan_term_months: 60,
            depreciation: DepreciationCurve::Exponential {
                annual_rate: dec!(0.15),
            },
            sales_tax_rate: dec!(0.0625),
            fees: dec!(500),
            finance_taxes_and_fees: true,
        }
    }

    #[test]
    fn test_financed_breakdown() {
        let b = buy().purchase_breakdown();
        assert_eq!(b.taxable_amount, dec!(35500));
        assert_eq!(b.sales_tax, dec!(2218.75));
        assert_eq!(b.total_purchase_cost, dec!(37718.75));
        assert_eq!(b.financed_principal, dec!(32718.75));
        assert_eq!(b.upfront_cash, dec!(5000));
    }

    #[test]
    fn test_cash_taxes_breakdown() {
        let mut input = buy();
        input.finance_taxes_and_fees = false;
        let b = input.purchase_breakdown();
        assert_eq!(b.financed_principal, dec!(30000));
        assert_eq!(b.upfront_cash, dec!(5000) + dec!(2218.75) + dec!(500));
    }

    #[test]
    fn test_down_payment_above_cost_rejected() {
        let mut input = buy();
        input.down_payment = dec!(50000);
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), Some("buy.down_payment"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut input = buy();
        input.vehicle_price = dec!(-1);
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), Some("buy.vehicle_price"));
    }

    #[test]
    fn test_zero_apr_is_valid() {
        let mut input = buy();
        input.apr = Decimal::ZERO;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_apr_in_percent_rejected() {
        let mut input = buy();
        input.apr = dec!(5);
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), Some("buy.apr"));
    }

    #[test]
    fn test_loan_term_outside_range_rejected() {
        for term in [0, 6, 97, 240] {
            let mut input = buy();
            input.loan_term_months = term;
            let err = input.validate().unwrap_err();
            assert_eq!(err.field(), Some("buy.loan_term_months"));
        }
        let mut input = buy();
        input.loan_term_months = 96;
        assert!(input.validate().is_ok());
    }
}
