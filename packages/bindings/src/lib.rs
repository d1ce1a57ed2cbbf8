use napi::Result as NapiResult;
use napi_derive::napi;

use lease_buy_core::buy::loan::{self, LoanInput};
use lease_buy_core::lease::payment::{self, LeasePaymentInput};
use lease_buy_core::SimpleDefaults;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Run a simple- or advanced-mode comparison. `defaults_json` optionally
/// overrides any of the simple-mode defaults.
#[napi]
pub fn compare_lease_vs_buy(
    request_json: String,
    defaults_json: Option<String>,
) -> NapiResult<String> {
    let request = lease_buy_core::parse_request(&request_json).map_err(to_napi_error)?;
    let defaults: SimpleDefaults = match defaults_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => SimpleDefaults::default(),
    };
    let output = lease_buy_core::compare_request(&request, &defaults).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn lease_payment(input_json: String) -> NapiResult<String> {
    let input: LeasePaymentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payment::calculate_lease_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_payment(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
