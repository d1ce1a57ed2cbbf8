//! Annuity primitives shared by the loan and lease paths.
//!
//! Sign convention follows the spreadsheet functions: cash received is
//! positive, cash paid is negative.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::LeaseBuyError;
use crate::types::{Money, Months, Rate};
use crate::LeaseBuyResult;

/// Payment (PMT)
pub fn pmt(
    rate: Rate,
    nper: Months,
    present_value: Money,
    future_value: Money,
) -> LeaseBuyResult<Money> {
    if nper == 0 {
        return Err(LeaseBuyError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let (factor, annuity_factor) = growth_factors(rate, nper)?;

    if annuity_factor.is_zero() {
        return Err(LeaseBuyError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    present_value
        .checked_mul(factor)
        .and_then(|grown| grown.checked_add(future_value))
        .and_then(|total| total.checked_div(annuity_factor))
        .map(|payment| -payment)
        .ok_or_else(|| out_of_range(rate, nper))
}

/// Future Value
pub fn fv(rate: Rate, nper: Months, pmt: Money, present_value: Money) -> LeaseBuyResult<Money> {
    if rate.is_zero() {
        return Ok(-(present_value + pmt * Decimal::from(nper)));
    }

    let (factor, annuity_factor) = growth_factors(rate, nper)?;

    let grown = present_value.checked_mul(factor);
    let annuity = pmt.checked_mul(annuity_factor);
    grown
        .zip(annuity)
        .and_then(|(g, a)| g.checked_add(a))
        .map(|total| -total)
        .ok_or_else(|| out_of_range(rate, nper))
}

/// `(1 + rate)^nper` and `((1 + rate)^nper - 1) / rate`, or an input error
/// when either leaves the Decimal range.
fn growth_factors(rate: Rate, nper: Months) -> LeaseBuyResult<(Decimal, Decimal)> {
    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| out_of_range(rate, nper))?;
    let annuity_factor = (factor - Decimal::ONE)
        .checked_div(rate)
        .ok_or_else(|| out_of_range(rate, nper))?;
    Ok((factor, annuity_factor))
}

fn out_of_range(rate: Rate, nper: Months) -> LeaseBuyError {
    LeaseBuyError::InvalidInput {
        field: "rate".into(),
        reason: format!(
            "Periodic rate {rate} compounded over {nper} periods exceeds the representable range"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pmt_zero_rate_is_straight_division() {
        let result = pmt(dec!(0), 12, dec!(12000), dec!(0)).unwrap();
        assert_eq!(result, dec!(-1000));
    }

    #[test]
    fn test_pmt_standard_car_loan() {
        // 20,000 at 5% APR over 60 months ≈ 377.42
        let result = pmt(dec!(0.05) / dec!(12), 60, dec!(20000), dec!(0)).unwrap();
        assert_eq!(result.round_dp(2), dec!(-377.42));
    }

    #[test]
    fn test_pmt_rejects_zero_periods() {
        assert!(pmt(dec!(0.01), 0, dec!(1000), dec!(0)).is_err());
    }

    #[test]
    fn test_fv_of_fully_amortized_loan_is_zero() {
        let rate = dec!(0.06) / dec!(12);
        let payment = pmt(rate, 48, dec!(15000), dec!(0)).unwrap();
        let remaining = fv(rate, 48, payment, dec!(15000)).unwrap();
        assert!(remaining.abs() < dec!(0.000001));
    }

    #[test]
    fn test_fv_zero_rate() {
        assert_eq!(fv(dec!(0), 10, dec!(-100), dec!(2000)).unwrap(), dec!(-1000));
    }

    #[test]
    fn test_pmt_overflow_is_an_error() {
        // 500% APR compounded monthly over 20 years
        let err = pmt(dec!(5) / dec!(12), 240, dec!(27000), dec!(0)).unwrap_err();
        assert_eq!(err.field(), Some("rate"));
    }

    #[test]
    fn test_fv_overflow_is_an_error() {
        assert!(fv(dec!(5) / dec!(12), 240, dec!(-500), dec!(27000)).is_err());
    }
}
