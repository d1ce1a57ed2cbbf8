use lease_buy_core::buy::loan;
use lease_buy_core::buy::DepreciationCurve;
use lease_buy_core::comparison::{
    compare, compare_request, parse_request, ComparisonInput, ComparisonRequest, SimpleInputs,
    Winner,
};
use lease_buy_core::horizon::{HorizonPolicy, LeaseEnd};
use lease_buy_core::lease::{LeaseInputs, LeasePricing, LeaseRate, MileageTerms, Residual};
use lease_buy_core::{LeaseBuyError, SimpleDefaults};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_lease() -> LeaseInputs {
    LeaseInputs {
        pricing: LeasePricing::Structured {
            cap_cost: dec!(28000),
            cap_cost_reduction: dec!(0),
            residual: Residual::PercentOfMsrp {
                msrp: dec!(28000),
                percent: dec!(0.60),
            },
            rate: LeaseRate::MoneyFactor(dec!(0.00125)),
            payment_tax_rate: dec!(0),
        },
        term_months: 36,
        due_at_signing: dec!(0),
        taxes_and_fees: dec!(0),
        disposition_fee: dec!(0),
        mileage: MileageTerms {
            annual_allowance: 12_000,
            anticipated_annual_miles: 10_000,
            excess_mile_rate: dec!(0.20),
        },
    }
}

fn reference_comparison() -> ComparisonInput {
    ComparisonInput {
        lease: Some(reference_lease()),
        buy: lease_buy_core::buy::BuyInputs {
            vehicle_price: dec!(30000),
            down_payment: dec!(3000),
            apr: dec!(0.05),
            loan_term_months: 60,
            depreciation: DepreciationCurve::Exponential {
                annual_rate: dec!(0.15),
            },
            sales_tax_rate: dec!(0),
            fees: dec!(0),
            finance_taxes_and_fees: true,
        },
        horizon_months: 36,
        horizon_policy: HorizonPolicy::Strict,
    }
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_reference_lease_payment() {
    let out = compare(&reference_comparison()).unwrap();
    let payment = out.result.summary.lease_monthly_payment.unwrap();
    // (28000 - 16800) / 36 + (28000 + 16800) * 0.00125 = 311.11 + 56.00
    assert_eq!(payment.round_dp(2), dec!(367.11));
}

#[test]
fn test_reference_loan_payment_and_equity() {
    let out = compare(&reference_comparison()).unwrap();
    let summary = &out.result.summary;
    assert_eq!(summary.financed_principal, dec!(27000));
    assert_eq!(summary.buy_monthly_payment.round_dp(2), dec!(509.52));

    let balance_36 = loan::remaining_balance(dec!(27000), dec!(0.05), 60, 36).unwrap();
    let expected_equity = summary.value_at_horizon - balance_36;
    assert!((summary.equity_at_horizon - expected_equity).abs() < dec!(0.000001));
}

#[test]
fn test_simple_quote_recommendation() {
    let request = ComparisonRequest::Simple(SimpleInputs {
        monthly_lease_payment: Some(dec!(400)),
        vehicle_price: Some(dec!(30000)),
        apr: Some(dec!(0.06)),
        annual_miles: Some(12_000),
        horizon_months: 36,
        ..SimpleInputs::default()
    });
    let out = compare_request(&request, &SimpleDefaults::default()).unwrap();
    let rec = &out.result.recommendation;

    let lease = rec.final_lease_cost.unwrap();
    let expected = if (lease - rec.final_buy_cost).abs() < dec!(0.01) {
        Winner::Tie
    } else if lease < rec.final_buy_cost {
        Winner::Lease
    } else {
        Winner::Buy
    };
    assert_eq!(rec.winner, expected);

    // Stored as a ratio of the larger final cost, never as whole percent
    let larger = lease.abs().max(rec.final_buy_cost.abs());
    assert_eq!(rec.percent_difference, rec.difference / larger);
    assert!(rec.percent_difference >= Decimal::ZERO && rec.percent_difference <= Decimal::ONE);
    assert!(out.assumptions["percent_difference"]
        .as_str()
        .unwrap()
        .contains("0.25 = 25%"));
}

// ===========================================================================
// Series invariants
// ===========================================================================

#[test]
fn test_series_cover_every_month_in_order() {
    for horizon in [1u32, 12, 24, 36] {
        let mut input = reference_comparison();
        input.horizon_months = horizon;
        let out = compare(&input).unwrap().result;
        assert_eq!(out.lease_series.len(), horizon as usize);
        assert_eq!(out.buy_series.len(), horizon as usize);
        let months: Vec<u32> = out.series.iter().map(|p| p.month).collect();
        assert_eq!(months, (1..=horizon).collect::<Vec<_>>());
    }
}

#[test]
fn test_balance_non_increasing_and_zero_at_loan_term() {
    let mut input = reference_comparison();
    input.horizon_months = 60;
    input.horizon_policy = HorizonPolicy::Extrapolate {
        lease_end: LeaseEnd::Renew,
    };
    let out = compare(&input).unwrap().result;
    for w in out.buy_series.windows(2) {
        assert!(w[1].remaining_balance <= w[0].remaining_balance);
    }
    assert_eq!(out.buy_series[59].remaining_balance, Decimal::ZERO);
}

#[test]
fn test_zero_apr_payment_is_price_over_term() {
    let mut input = reference_comparison();
    input.buy.apr = Decimal::ZERO;
    input.buy.down_payment = Decimal::ZERO;
    let out = compare(&input).unwrap().result;
    assert_eq!(out.summary.buy_monthly_payment, dec!(30000) / dec!(60));
    assert_eq!(out.summary.total_interest_paid, Decimal::ZERO);
}

#[test]
fn test_zero_money_factor_is_valid() {
    let mut input = reference_comparison();
    if let Some(LeasePricing::Structured { rate, .. }) = input.lease.as_mut().map(|l| &mut l.pricing) {
        *rate = LeaseRate::Apr(Decimal::ZERO);
    }
    let out = compare(&input).unwrap().result;
    assert_eq!(
        out.summary.lease_monthly_payment.unwrap(),
        dec!(11200) / dec!(36)
    );
}

#[test]
fn test_no_mileage_penalty_within_allowance() {
    let out = compare(&reference_comparison()).unwrap().result;
    assert_eq!(out.summary.lease_mileage_penalty, Some(Decimal::ZERO));
    assert!(out
        .lease_series
        .iter()
        .all(|p| p.mileage_penalty_accrued.is_zero()));
}

#[test]
fn test_compare_is_idempotent() {
    let input = reference_comparison();
    let first = compare(&input).unwrap();
    let second = compare(&input).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.warnings, second.warnings);
}

// ===========================================================================
// Extrapolation
// ===========================================================================

#[test]
fn test_walk_away_lease_is_flat_after_term() {
    let mut input = reference_comparison();
    input.horizon_months = 60;
    input.horizon_policy = HorizonPolicy::Extrapolate {
        lease_end: LeaseEnd::WalkAway,
    };
    let out = compare(&input).unwrap();
    let lease = &out.result.lease_series;
    assert_eq!(lease[59].net_cost, lease[35].net_cost);
    assert!(out.warnings.iter().any(|w| w.contains("Lease returned")));
}

#[test]
fn test_renewed_lease_keeps_paying() {
    let mut input = reference_comparison();
    input.horizon_months = 60;
    input.horizon_policy = HorizonPolicy::Extrapolate {
        lease_end: LeaseEnd::Renew,
    };
    let out = compare(&input).unwrap().result;
    assert_eq!(out.summary.lease_cycles, Some(2));
    assert!(out.lease_series[59].net_cost > out.lease_series[35].net_cost);
}

// ===========================================================================
// Failure conditions
// ===========================================================================

#[test]
fn test_horizon_past_term_without_policy_rejected() {
    let mut input = reference_comparison();
    input.horizon_months = 37;
    let err = compare(&input).unwrap_err();
    assert!(matches!(err, LeaseBuyError::InvalidInput { .. }));
    assert_eq!(err.field(), Some("horizon_months"));
}

#[test]
fn test_negative_money_rejected() {
    let mut input = reference_comparison();
    input.buy.down_payment = dec!(-500);
    let err = compare(&input).unwrap_err();
    assert_eq!(err.field(), Some("buy.down_payment"));
    assert!(err.to_string().contains("non-negative"));
}

#[test]
fn test_missing_rates_is_configuration_error() {
    let json = r#"{"mode": "simple", "vehicle_price": 30000, "horizon_months": 36}"#;
    let request = parse_request(json).unwrap();
    let err = compare_request(&request, &SimpleDefaults::default()).unwrap_err();
    assert!(matches!(err, LeaseBuyError::Configuration { .. }));
}

#[test]
fn test_apr_entered_as_percent_rejected() {
    let json = r#"{"mode": "simple", "monthly_lease_payment": 400, "vehicle_price": 30000,
                   "apr": 5, "loan_term_months": 60, "horizon_months": 36}"#;
    let request = parse_request(json).unwrap();
    let err = compare_request(&request, &SimpleDefaults::default()).unwrap_err();
    assert_eq!(err.field(), Some("buy.apr"));
}

#[test]
fn test_loan_term_beyond_range_rejected() {
    let json = r#"{"mode": "simple", "monthly_lease_payment": 400, "vehicle_price": 30000,
                   "apr": 0.05, "loan_term_months": 240, "horizon_months": 36}"#;
    let request = parse_request(json).unwrap();
    let err = compare_request(&request, &SimpleDefaults::default()).unwrap_err();
    assert_eq!(err.field(), Some("buy.loan_term_months"));
}

#[test]
fn test_oversized_extrapolated_horizon_rejected() {
    let json = r#"{"mode": "simple", "monthly_lease_payment": 400, "vehicle_price": 30000,
                   "apr": 0.06, "horizon_months": 4294967295,
                   "horizon_policy": {"policy": "extrapolate", "lease_end": "renew"}}"#;
    let request = parse_request(json).unwrap();
    let err = compare_request(&request, &SimpleDefaults::default()).unwrap_err();
    assert!(matches!(err, LeaseBuyError::InvalidInput { .. }));
    assert_eq!(err.field(), Some("horizon_months"));
}

#[test]
fn test_full_lease_cost_reported_alongside_horizon_cost() {
    let mut input = reference_comparison();
    input.horizon_months = 24;
    let out = compare(&input).unwrap().result;
    let summary = &out.summary;
    let full = summary.lease_full_term_cost.unwrap();
    let at_horizon = out.recommendation.final_lease_cost.unwrap();
    // Two thirds of the payments are made by month 24
    assert!(full > at_horizon);
    assert_eq!(
        summary.lease_total_payments_term.unwrap(),
        summary.lease_monthly_payment.unwrap() * dec!(36)
    );
}

// ===========================================================================
// Advanced JSON round trip through the request surface
// ===========================================================================

#[test]
fn test_parse_advanced_request() {
    let json = r#"{
        "mode": "advanced",
        "lease": {
            "pricing": {
                "structured": {
                    "cap_cost": "36000",
                    "residual": { "percent_of_msrp": { "msrp": "38000", "percent": "0.58" } },
                    "rate": { "apr": "0.03" },
                    "payment_tax_rate": "0.0625"
                }
            },
            "term_months": 36,
            "due_at_signing": "2000",
            "disposition_fee": "395",
            "mileage": {
                "annual_allowance": 12000,
                "anticipated_annual_miles": 15000,
                "excess_mile_rate": "0.25"
            }
        },
        "buy": {
            "vehicle_price": "35000",
            "down_payment": "5000",
            "apr": "0.05",
            "loan_term_months": 60,
            "depreciation": { "model": "resale_target", "resale_value": "19250" },
            "sales_tax_rate": "0.0625",
            "fees": "500"
        },
        "horizon_months": 36
    }"#;
    let request = parse_request(json).unwrap();
    let out = compare_request(&request, &SimpleDefaults::default()).unwrap();
    assert_eq!(out.result.series.len(), 36);
    assert_eq!(out.result.summary.lease_mileage_penalty, Some(dec!(2250)));
    assert_eq!(out.result.summary.value_at_horizon, dec!(19250));
}
