use rust_decimal::Decimal;

use crate::defaults::MAX_HORIZON_MONTHS;
use crate::error::LeaseBuyError;
use crate::LeaseBuyResult;

pub(crate) fn invalid(field: &str, reason: &str) -> LeaseBuyError {
    LeaseBuyError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Reject negative monetary amounts and rates.
pub(crate) fn non_negative(field: &str, value: Decimal) -> LeaseBuyResult<()> {
    if value < Decimal::ZERO {
        return Err(LeaseBuyError::InvalidInput {
            field: field.into(),
            reason: format!("Must be non-negative, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn positive_term(field: &str, months: u32) -> LeaseBuyResult<()> {
    if months == 0 {
        return Err(invalid(field, "Term must be greater than zero"));
    }
    Ok(())
}

pub(crate) fn at_most(field: &str, value: Decimal, max: Decimal, reason: &str) -> LeaseBuyResult<()> {
    if value > max {
        return Err(LeaseBuyError::InvalidInput {
            field: field.into(),
            reason: format!("{reason}, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn term_between(field: &str, months: u32, min: u32, max: u32) -> LeaseBuyResult<()> {
    if months < min || months > max {
        return Err(LeaseBuyError::InvalidInput {
            field: field.into(),
            reason: format!("Term must be between {min} and {max} months, got {months}"),
        });
    }
    Ok(())
}

/// Horizon must be between one month and [`MAX_HORIZON_MONTHS`].
pub(crate) fn horizon_in_range(horizon_months: u32) -> LeaseBuyResult<()> {
    if horizon_months == 0 {
        return Err(invalid("horizon_months", "Horizon must be at least one month"));
    }
    if horizon_months > MAX_HORIZON_MONTHS {
        return Err(invalid(
            "horizon_months",
            &format!(
                "Horizon of {horizon_months} months exceeds the {MAX_HORIZON_MONTHS}-month maximum"
            ),
        ));
    }
    Ok(())
}
