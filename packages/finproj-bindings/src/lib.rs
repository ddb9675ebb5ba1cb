use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use finproj_core::consolidation::aggregate::PeriodSummary;
use finproj_core::consolidation::monthly::MonthlyStatement;
use finproj_core::EngineConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine configuration from an optional JSON string; omitted keys keep defaults.
fn engine_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    let config: EngineConfig = match config_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => EngineConfig::default(),
    };
    config.validate().map_err(to_napi_error)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn build_debt_schedule(input_json: String) -> NapiResult<String> {
    let input: finproj_core::schedules::debt::DebtInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        finproj_core::schedules::debt::build_debt_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_depreciation_schedule(input_json: String) -> NapiResult<String> {
    let input: finproj_core::schedules::depreciation::DepreciationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finproj_core::schedules::depreciation::build_depreciation_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------------

#[napi]
pub fn consolidate_monthly(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: finproj_core::consolidation::inputs::ConsolidationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = engine_config(config_json)?;
    let output = finproj_core::consolidation::monthly::consolidate_monthly(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn aggregate_periods(monthly_json: String) -> NapiResult<String> {
    let monthly: Vec<MonthlyStatement> =
        serde_json::from_str(&monthly_json).map_err(to_napi_error)?;
    let output =
        finproj_core::consolidation::aggregate::aggregate(&monthly).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SummaryInput {
    monthly: Vec<MonthlyStatement>,
    quarterly: Vec<PeriodSummary>,
    annual: Vec<PeriodSummary>,
}

#[napi]
pub fn summarize(input_json: String) -> NapiResult<String> {
    let input: SummaryInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finproj_core::consolidation::summary::summarize(
        &input.monthly,
        &input.quarterly,
        &input.annual,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[napi]
pub fn run_projection(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let inputs: finproj_core::pipeline::ProjectionInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = engine_config(config_json)?;
    let output =
        finproj_core::pipeline::run_projection(&inputs, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Run the projection and return one series as CSV. `series` is one of
/// `senior_debt`, `short_term_debt`, `depreciation`, `monthly`, `quarterly`, `annual`.
#[napi]
pub fn export_series(
    input_json: String,
    series: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let inputs: finproj_core::pipeline::ProjectionInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let series: finproj_core::export::Series =
        serde_json::from_value(serde_json::Value::String(series)).map_err(to_napi_error)?;
    let config = engine_config(config_json)?;
    let output =
        finproj_core::pipeline::run_projection(&inputs, &config).map_err(to_napi_error)?;
    finproj_core::export::export_series(&output.result, series).map_err(to_napi_error)
}
