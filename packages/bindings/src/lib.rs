use napi::Result as NapiResult;
use napi_derive::napi;

use dsr_core::advice::prompt::AdvicePrompt;
use dsr_core::dsr::{engine, params::LoanParameters, schedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse and validate a loan scenario at the JavaScript boundary.
fn parse_params(input_json: &str) -> NapiResult<LoanParameters> {
    let params: LoanParameters = serde_json::from_str(input_json).map_err(to_napi_error)?;
    params.validate().map_err(to_napi_error)?;
    Ok(params)
}

// ---------------------------------------------------------------------------
// DSR engine
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_dsr(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = engine::calculate_dsr(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn actual_schedule(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = schedule::generate_actual_schedule(&params);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn stress_schedule(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = schedule::generate_stress_schedule(&params);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Advice
// ---------------------------------------------------------------------------

/// Prompt for the UI to send to its text-generation service. The service
/// call itself stays on the JavaScript side.
#[napi]
pub fn advice_prompt(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let result = engine::compute_dsr(&params);
    let prompt = AdvicePrompt::build(&params, &result);
    serde_json::to_string(&prompt).map_err(to_napi_error)
}
