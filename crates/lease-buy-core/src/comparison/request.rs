//! Request parsing and simple-mode resolution.
//!
//! A simple request carries a handful of headline numbers; everything else
//! is filled from [`SimpleDefaults`]. An advanced request is a complete
//! [`ComparisonInput`] and passes through untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::buy::{BuyInputs, DepreciationCurve};
use crate::comparison::{compare, ComparisonInput, ComparisonOutput};
use crate::defaults::{SimpleDefaults, MONEY_FACTOR_DIVISOR};
use crate::error::LeaseBuyError;
use crate::horizon::HorizonPolicy;
use crate::lease::{LeaseInputs, LeasePricing, LeaseRate, MileageTerms, Residual};
use crate::types::{ComputationOutput, Money, Months, Rate};
use crate::LeaseBuyResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ComparisonRequest {
    Simple(SimpleInputs),
    Advanced(ComparisonInput),
}

/// Simple-mode request. Every optional field falls back to a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleInputs {
    /// Quoted lease payment, tax included. Omit to derive one from the price.
    pub monthly_lease_payment: Option<Money>,
    pub vehicle_price: Option<Money>,
    /// Loan APR as a decimal
    pub apr: Option<Rate>,
    pub money_factor: Option<Rate>,
    pub annual_miles: Option<u32>,
    pub horizon_months: Months,
    pub down_payment: Option<Money>,
    pub loan_term_months: Option<Months>,
    pub lease_term_months: Option<Months>,
    pub due_at_signing: Option<Money>,
    #[serde(default)]
    pub horizon_policy: HorizonPolicy,
}

impl SimpleInputs {
    /// Fill every missing field from `defaults`.
    pub fn resolve(&self, defaults: &SimpleDefaults) -> LeaseBuyResult<ComparisonInput> {
        let price = self.vehicle_price.ok_or_else(|| LeaseBuyError::Configuration {
            field: "vehicle_price".into(),
            reason: "Vehicle price is required to derive loan and lease defaults".into(),
        })?;

        let (apr, money_factor) = match (self.apr, self.money_factor) {
            (Some(apr), Some(mf)) => (apr, mf),
            (Some(apr), None) => (apr, apr / MONEY_FACTOR_DIVISOR),
            (None, Some(mf)) => (mf * MONEY_FACTOR_DIVISOR, mf),
            (None, None) => {
                return Err(LeaseBuyError::Configuration {
                    field: "apr".into(),
                    reason: "APR or money factor is required; neither was supplied".into(),
                })
            }
        };

        let pricing = match self.monthly_lease_payment {
            Some(monthly_payment) => LeasePricing::Flat { monthly_payment },
            None => LeasePricing::Structured {
                cap_cost: price,
                cap_cost_reduction: Decimal::ZERO,
                residual: Residual::Amount(price * defaults.residual_pct),
                rate: LeaseRate::MoneyFactor(money_factor),
                payment_tax_rate: defaults.sales_tax_rate,
            },
        };

        let lease = LeaseInputs {
            pricing,
            term_months: self.lease_term_months.unwrap_or(defaults.lease_term_months),
            due_at_signing: self.due_at_signing.unwrap_or(defaults.due_at_signing),
            taxes_and_fees: Decimal::ZERO,
            disposition_fee: defaults.disposition_fee,
            mileage: MileageTerms {
                annual_allowance: defaults.mileage_allowance,
                anticipated_annual_miles: self.annual_miles.unwrap_or(defaults.annual_miles),
                excess_mile_rate: defaults.excess_mile_rate,
            },
        };

        let buy = BuyInputs {
            vehicle_price: price,
            down_payment: self
                .down_payment
                .unwrap_or_else(|| defaults.down_payment.min(price)),
            apr,
            loan_term_months: self.loan_term_months.unwrap_or(defaults.loan_term_months),
            depreciation: DepreciationCurve::ResaleTarget {
                resale_value: price * defaults.resale_pct_for_horizon(self.horizon_months),
            },
            sales_tax_rate: defaults.sales_tax_rate,
            fees: defaults.buy_fees,
            finance_taxes_and_fees: true,
        };

        Ok(ComparisonInput {
            lease: Some(lease),
            buy,
            horizon_months: self.horizon_months,
            horizon_policy: self.horizon_policy,
        })
    }

    /// Names of the optional fields that will come from defaults.
    pub fn defaulted_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.monthly_lease_payment.is_none() {
            fields.push("monthly_lease_payment");
        }
        if self.apr.is_none() {
            fields.push("apr");
        }
        if self.money_factor.is_none() {
            fields.push("money_factor");
        }
        if self.annual_miles.is_none() {
            fields.push("annual_miles");
        }
        if self.down_payment.is_none() {
            fields.push("down_payment");
        }
        if self.loan_term_months.is_none() {
            fields.push("loan_term_months");
        }
        if self.lease_term_months.is_none() {
            fields.push("lease_term_months");
        }
        if self.due_at_signing.is_none() {
            fields.push("due_at_signing");
        }
        fields
    }
}

impl ComparisonRequest {
    pub fn resolve(&self, defaults: &SimpleDefaults) -> LeaseBuyResult<ComparisonInput> {
        match self {
            ComparisonRequest::Simple(simple) => simple.resolve(defaults),
            ComparisonRequest::Advanced(input) => Ok(input.clone()),
        }
    }
}

/// Parse a JSON request. Malformed or non-numeric values are input errors.
pub fn parse_request(json: &str) -> LeaseBuyResult<ComparisonRequest> {
    serde_json::from_str(json).map_err(|e| LeaseBuyError::InvalidInput {
        field: "request".into(),
        reason: e.to_string(),
    })
}

/// Resolve and run a request in one step.
pub fn compare_request(
    request: &ComparisonRequest,
    defaults: &SimpleDefaults,
) -> LeaseBuyResult<ComputationOutput<ComparisonOutput>> {
    let input = request.resolve(defaults)?;
    let mut output = compare(&input)?;

    if let ComparisonRequest::Simple(simple) = request {
        let defaulted = simple.defaulted_fields();
        tracing::debug!(?defaulted, "simple-mode defaults applied");
        if let Some(obj) = output.assumptions.as_object_mut() {
            obj.insert("mode".into(), "simple".into());
            obj.insert("defaults_applied".into(), serde_json::json!(defaulted));
            obj.insert("defaults".into(), serde_json::to_value(defaults)?);
        }
    }

    Ok(output)
}
