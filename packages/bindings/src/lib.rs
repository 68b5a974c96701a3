use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use edufin_core::insights::{InsightInput, InsightThresholds};
use edufin_core::investor::{InvestorInput, ProjectionRow};
use edufin_core::types::{Granularity, Money, PaymentRecord, PeriodBucket};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[napi]
pub fn load_dataset(csv_text: String, column_map_json: String) -> NapiResult<String> {
    let map: edufin_core::dataset::ColumnMap =
        serde_json::from_str(&column_map_json).map_err(to_napi_error)?;
    let load =
        edufin_core::dataset::load_records(csv_text.as_bytes(), &map).map_err(to_napi_error)?;
    serde_json::to_string(&load).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Aggregation & growth
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AggregateRequest {
    records: Vec<PaymentRecord>,
    granularity: Granularity,
}

#[napi]
pub fn aggregate_revenue(input_json: String) -> NapiResult<String> {
    let input: AggregateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let buckets = edufin_core::aggregation::aggregate(&input.records, input.granularity);
    serde_json::to_string(&buckets).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct GrowthRequest {
    buckets: Vec<PeriodBucket>,
}

#[napi]
pub fn revenue_growth(input_json: String) -> NapiResult<String> {
    let input: GrowthRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let series = edufin_core::aggregation::growth(&input.buckets);
    serde_json::to_string(&series).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cost & margin metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn cost_snapshot(input_json: String) -> NapiResult<String> {
    let input: edufin_core::metrics::SnapshotInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = edufin_core::metrics::compute_snapshot(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn customer_acquisition_cost(input_json: String) -> NapiResult<String> {
    let input: edufin_core::metrics::CacInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let cac = edufin_core::metrics::customer_acquisition_cost(&input);
    serde_json::to_string(&cac).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RecurringRevenueRequest {
    total_program_fee: Money,
    #[serde(default = "default_installments")]
    installment_count: u32,
}

fn default_installments() -> u32 {
    edufin_core::metrics::DEFAULT_INSTALLMENT_COUNT
}

#[napi]
pub fn recurring_revenue(input_json: String) -> NapiResult<String> {
    let input: RecurringRevenueRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rr = edufin_core::metrics::recurring_revenue(input.total_program_fee, input.installment_count)
        .map_err(to_napi_error)?;
    serde_json::to_string(&rr).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection & valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn build_projection(input_json: String) -> NapiResult<String> {
    let input: edufin_core::investor::ProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = edufin_core::investor::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ValuationRequest {
    rows: Vec<ProjectionRow>,
    investor: InvestorInput,
}

#[napi]
pub fn investor_valuation(input_json: String) -> NapiResult<String> {
    let input: ValuationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        edufin_core::investor::valuate(&input.rows, &input.investor).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Insights & full dashboard pass
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct InsightRequest {
    input: InsightInput,
    #[serde(default)]
    thresholds: Option<InsightThresholds>,
}

#[napi]
pub fn automated_insights(input_json: String) -> NapiResult<String> {
    let request: InsightRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let thresholds = request.thresholds.unwrap_or_default();
    let insights = edufin_core::insights::evaluate(&request.input, &thresholds);
    serde_json::to_string(&insights).map_err(to_napi_error)
}

#[napi]
pub fn run_dashboard(csv_text: String, config_json: String) -> NapiResult<String> {
    let config: edufin_core::workflows::DashboardConfig =
        serde_json::from_str(&config_json).map_err(to_napi_error)?;
    let map = edufin_core::dataset::ColumnMap::default();
    let load =
        edufin_core::dataset::load_records(csv_text.as_bytes(), &map).map_err(to_napi_error)?;
    let output =
        edufin_core::workflows::run_dashboard(&load.records, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
