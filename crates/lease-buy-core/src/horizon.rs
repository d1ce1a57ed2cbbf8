use serde::{Deserialize, Serialize};

use crate::types::Months;
use crate::validation::{horizon_in_range, invalid};
use crate::LeaseBuyResult;

/// What the lessee does when the lease ends inside the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseEnd {
    /// Sign an identical lease: new upfront cash, fees and payments.
    Renew,
    /// Return the car; lease cost stays flat for the rest of the horizon.
    WalkAway,
}

/// How a horizon longer than the lease or loan term is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// Horizon must fit inside both terms.
    #[default]
    Strict,
    /// Past the loan term the owner keeps the car with no payments; past the
    /// lease term `lease_end` applies.
    Extrapolate { lease_end: LeaseEnd },
}

impl HorizonPolicy {
    pub fn lease_end(&self) -> Option<LeaseEnd> {
        match self {
            HorizonPolicy::Strict => None,
            HorizonPolicy::Extrapolate { lease_end } => Some(*lease_end),
        }
    }

    /// Reject horizons the policy has no rule for.
    pub fn check(
        &self,
        horizon_months: Months,
        lease_term_months: Option<Months>,
        loan_term_months: Months,
    ) -> LeaseBuyResult<()> {
        horizon_in_range(horizon_months)?;
        if *self != HorizonPolicy::Strict {
            return Ok(());
        }
        if let Some(term) = lease_term_months {
            if horizon_months > term {
                return Err(invalid(
                    "horizon_months",
                    &format!(
                        "Horizon of {horizon_months} months exceeds the {term}-month lease term \
                         and no extrapolation policy is set"
                    ),
                ));
            }
        }
        if horizon_months > loan_term_months {
            return Err(invalid(
                "horizon_months",
                &format!(
                    "Horizon of {horizon_months} months exceeds the {loan_term_months}-month loan \
                     term and no extrapolation policy is set"
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::MAX_HORIZON_MONTHS;

    #[test]
    fn test_strict_accepts_horizon_within_both_terms() {
        assert!(HorizonPolicy::Strict.check(36, Some(36), 60).is_ok());
    }

    #[test]
    fn test_strict_rejects_horizon_past_lease_term() {
        let err = HorizonPolicy::Strict.check(48, Some(36), 60).unwrap_err();
        assert_eq!(err.field(), Some("horizon_months"));
        assert!(err.to_string().contains("lease term"));
    }

    #[test]
    fn test_strict_rejects_horizon_past_loan_term() {
        let err = HorizonPolicy::Strict.check(72, None, 60).unwrap_err();
        assert!(err.to_string().contains("loan term"));
    }

    #[test]
    fn test_extrapolate_accepts_long_horizon() {
        let policy = HorizonPolicy::Extrapolate {
            lease_end: LeaseEnd::Renew,
        };
        assert!(policy.check(84, Some(36), 60).is_ok());
    }

    #[test]
    fn test_zero_horizon_always_rejected() {
        let policy = HorizonPolicy::Extrapolate {
            lease_end: LeaseEnd::WalkAway,
        };
        assert!(policy.check(0, Some(36), 60).is_err());
    }

    #[test]
    fn test_extrapolate_still_capped() {
        let policy = HorizonPolicy::Extrapolate {
            lease_end: LeaseEnd::Renew,
        };
        assert!(policy.check(MAX_HORIZON_MONTHS, Some(36), 60).is_ok());
        for horizon in [MAX_HORIZON_MONTHS + 1, u32::MAX] {
            let err = policy.check(horizon, Some(36), 60).unwrap_err();
            assert_eq!(err.field(), Some("horizon_months"));
            assert!(err.to_string().contains("maximum"));
        }
    }
}
