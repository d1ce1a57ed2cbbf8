//! Lease path: payment derivation and the month-by-month net cost series.
//!
//! A lease builds no equity, so its net cost is simply the cash that leaves
//! the lessee's pocket: upfront cash, monthly payments, fees spread over the
//! horizon and any accrued excess-mileage penalty.

pub mod payment;
pub mod schedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, Rate};
use crate::validation::{invalid, non_negative, positive_term};
use crate::LeaseBuyResult;

/// How the monthly lease payment is obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeasePricing {
    /// Quoted payment, tax included. Used as given.
    Flat { monthly_payment: Money },
    /// Payment derived from the lease structure.
    Structured {
        cap_cost: Money,
        #[serde(default)]
        cap_cost_reduction: Money,
        residual: Residual,
        rate: LeaseRate,
        /// Sales tax charged on each payment.
        #[serde(default)]
        payment_tax_rate: Rate,
    },
}

/// Contractual residual value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Residual {
    Amount(Money),
    PercentOfMsrp { msrp: Money, percent: Rate },
}

impl Residual {
    pub fn value(&self) -> Money {
        match self {
            Residual::Amount(v) => *v,
            Residual::PercentOfMsrp { msrp, percent } => *msrp * *percent,
        }
    }
}

/// Lease finance charge, quoted either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseRate {
    MoneyFactor(Rate),
    Apr(Rate),
}

impl LeaseRate {
    pub fn money_factor(&self) -> Rate {
        match self {
            LeaseRate::MoneyFactor(mf) => *mf,
            LeaseRate::Apr(apr) => payment::apr_to_money_factor(*apr),
        }
    }
}

/// Mileage allowance and excess charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageTerms {
    pub annual_allowance: u32,
    pub anticipated_annual_miles: u32,
    /// Charge per mile over the allowance.
    pub excess_mile_rate: Money,
}

impl MileageTerms {
    /// Miles per year over the allowance; zero when within it.
    pub fn annual_excess_miles(&self) -> u32 {
        self.anticipated_annual_miles
            .saturating_sub(self.annual_allowance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseInputs {
    pub pricing: LeasePricing,
    pub term_months: Months,
    /// Cash due at signing that is not a fee (first payment excluded).
    #[serde(default)]
    pub due_at_signing: Money,
    /// Acquisition, registration and upfront tax charges.
    #[serde(default)]
    pub taxes_and_fees: Money,
    #[serde(default)]
    pub disposition_fee: Money,
    pub mileage: MileageTerms,
}

impl LeaseInputs {
    /// Cash paid when a lease cycle starts.
    pub fn upfront_cash(&self) -> Money {
        let reduction = match &self.pricing {
            LeasePricing::Structured {
                cap_cost_reduction, ..
            } => *cap_cost_reduction,
            LeasePricing::Flat { .. } => Decimal::ZERO,
        };
        self.due_at_signing + reduction
    }

    /// Fees charged once per lease cycle.
    pub fn fees_per_cycle(&self) -> Money {
        self.taxes_and_fees + self.disposition_fee
    }

    /// Every monthly payment of one full term.
    pub fn total_payments_over_term(&self) -> LeaseBuyResult<Money> {
        Ok(self.monthly_payment()? * Decimal::from(self.term_months))
    }

    /// Excess mileage charge for one full term.
    pub fn mileage_penalty_over_term(&self) -> Money {
        Decimal::from(self.mileage.annual_excess_miles())
            * self.mileage.excess_mile_rate
            * Decimal::from(self.term_months)
            / Decimal::from(12u32)
    }

    /// Net cost of one complete lease, start to turn-in, whatever the
    /// comparison horizon.
    pub fn full_term_cost(&self) -> LeaseBuyResult<Money> {
        Ok(self.upfront_cash()
            + self.total_payments_over_term()?
            + self.fees_per_cycle()
            + self.mileage_penalty_over_term())
    }

    /// Monthly payment including any tax on the payment.
    pub fn monthly_payment(&self) -> LeaseBuyResult<Money> {
        match &self.pricing {
            LeasePricing::Flat { monthly_payment } => Ok(*monthly_payment),
            LeasePricing::Structured {
                cap_cost,
                cap_cost_reduction,
                residual,
                rate,
                payment_tax_rate,
            } => {
                let breakdown = payment::lease_payment(
                    *cap_cost - *cap_cost_reduction,
                    residual.value(),
                    rate.money_factor(),
                    self.term_months,
                )?;
                Ok(breakdown.base_payment * (Decimal::ONE + *payment_tax_rate))
            }
        }
    }

    pub fn validate(&self) -> LeaseBuyResult<()> {
        positive_term("lease.term_months", self.term_months)?;
        non_negative("lease.due_at_signing", self.due_at_signing)?;
        non_negative("lease.taxes_and_fees", self.taxes_and_fees)?;
        non_negative("lease.disposition_fee", self.disposition_fee)?;
        non_negative("lease.mileage.excess_mile_rate", self.mileage.excess_mile_rate)?;

        match &self.pricing {
            LeasePricing::Flat { monthly_payment } => {
                non_negative("lease.pricing.monthly_payment", *monthly_payment)?;
            }
            LeasePricing::Structured {
                cap_cost,
                cap_cost_reduction,
                residual,
                rate,
                payment_tax_rate,
            } => {
                non_negative("lease.pricing.cap_cost", *cap_cost)?;
                non_negative("lease.pricing.cap_cost_reduction", *cap_cost_reduction)?;
                non_negative("lease.pricing.payment_tax_rate", *payment_tax_rate)?;
                if let Residual::PercentOfMsrp { msrp, percent } = residual {
                    non_negative("lease.pricing.residual.msrp", *msrp)?;
                    non_negative("lease.pricing.residual.percent", *percent)?;
                }
                non_negative("lease.pricing.residual", residual.value())?;
                match rate {
                    LeaseRate::MoneyFactor(mf) => {
                        non_negative("lease.pricing.rate.money_factor", *mf)?
                    }
                    LeaseRate::Apr(apr) => non_negative("lease.pricing.rate.apr", *apr)?,
                }
                if cap_cost_reduction > cap_cost {
                    return Err(invalid(
                        "lease.pricing.cap_cost_reduction",
                        "Cap cost reduction cannot exceed the cap cost",
                    ));
                }
                if residual.value() > *cap_cost - *cap_cost_reduction {
                    return Err(invalid(
                        "lease.pricing.residual",
                        "Residual value cannot exceed the adjusted cap cost",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn structured() -> LeaseInputs {
        LeaseInputs {
            pricing: LeasePricing::Structured {
                cap_cost: dec!(28000),
                cap_cost_reduction: dec!(0),
                residual: Residual::Amount(dec!(16800)),
                rate: LeaseRate::MoneyFactor(dec!(0.00125)),
                payment_tax_rate: dec!(0),
            },
            term_months: 36,
            due_at_signing: dec!(0),
            taxes_and_fees: dec!(0),
            disposition_fee: dec!(0),
            mileage: MileageTerms {
                annual_allowance: 12_000,
                anticipated_annual_miles: 12_000,
                excess_mile_rate: dec!(0.25),
            },
        }
    }

    #[test]
    fn test_structured_payment() {
        let lease = structured();
        assert_eq!(lease.monthly_payment().unwrap().round_dp(2), dec!(367.11));
    }

    #[test]
    fn test_payment_tax_applied_on_top() {
        let mut lease = structured();
        if let LeasePricing::Structured {
            payment_tax_rate, ..
        } = &mut lease.pricing
        {
            *payment_tax_rate = dec!(0.10);
        }
        let expected = (dec!(11200) / dec!(36) + dec!(56)) * dec!(1.10);
        assert_eq!(lease.monthly_payment().unwrap(), expected);
    }

    #[test]
    fn test_percent_of_msrp_residual() {
        let r = Residual::PercentOfMsrp {
            msrp: dec!(38000),
            percent: dec!(0.58),
        };
        assert_eq!(r.value(), dec!(22040));
    }

    #[test]
    fn test_upfront_cash_includes_cap_reduction() {
        let mut lease = structured();
        lease.due_at_signing = dec!(1000);
        if let LeasePricing::Structured {
            cap_cost_reduction, ..
        } = &mut lease.pricing
        {
            *cap_cost_reduction = dec!(2000);
        }
        assert_eq!(lease.upfront_cash(), dec!(3000));
    }

    #[test]
    fn test_residual_above_adjusted_cap_cost_rejected() {
        let mut lease = structured();
        if let LeasePricing::Structured {
            cap_cost_reduction, ..
        } = &mut lease.pricing
        {
            *cap_cost_reduction = dec!(12000);
        }
        let err = lease.validate().unwrap_err();
        assert_eq!(err.field(), Some("lease.pricing.residual"));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut lease = structured();
        lease.taxes_and_fees = dec!(-1);
        let err = lease.validate().unwrap_err();
        assert_eq!(err.field(), Some("lease.taxes_and_fees"));
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut lease = structured();
        lease.term_months = 0;
        assert!(lease.validate().is_err());
    }

    #[test]
    fn test_excess_miles_saturates() {
        let m = MileageTerms {
            annual_allowance: 12_000,
            anticipated_annual_miles: 10_000,
            excess_mile_rate: dec!(0.25),
        };
        assert_eq!(m.annual_excess_miles(), 0);
    }

    #[test]
    fn test_full_term_cost() {
        let mut lease = structured();
        lease.due_at_signing = dec!(2000);
        lease.disposition_fee = dec!(395);
        lease.mileage.anticipated_annual_miles = 15_000;

        let payments = lease.total_payments_over_term().unwrap();
        assert_eq!(payments, lease.monthly_payment().unwrap() * dec!(36));
        // 3,000 excess miles a year at 0.25 for three years
        assert_eq!(lease.mileage_penalty_over_term(), dec!(2250));
        assert_eq!(
            lease.full_term_cost().unwrap(),
            dec!(2000) + payments + dec!(395) + dec!(2250)
        );
    }
}
