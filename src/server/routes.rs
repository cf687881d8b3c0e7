use crate::errors::CondorError;
use crate::report;
use crate::state::{AppState, CalculationRequest, ComparisonRequest};
use crate::strategy;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

#[derive(Debug, Default, serde::Deserialize)]
pub struct CondorQuery {
    pub wing_width: Option<i64>,
    pub horizon: Option<String>,
    pub buffer_points: Option<f64>,
    pub target_date: Option<String>,
    /// Include the console rendering alongside the JSON fields
    pub text: Option<bool>,
}

type ApiResponse = (StatusCode, Json<serde_json::Value>);

/// Validation errors are the caller's to fix (400); data errors are upstream (503).
fn error_response(state: &AppState, e: &CondorError) -> ApiResponse {
    state.counters.record_error(e);
    let status = if e.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    tracing::warn!(error = %e, status = status.as_u16(), "request failed");
    (status, Json(serde_json::json!({ "error": e.to_string() })))
}

/// GET /api/condor -- fetch a quote and compute the four strikes
pub async fn get_condor(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CondorQuery>,
) -> ApiResponse {
    let request = CalculationRequest {
        wing_width: params.wing_width.unwrap_or(state.config.wing_width),
        horizon: params.horizon,
        buffer_points: params.buffer_points,
        target_date: params.target_date,
    };

    match strategy::calculate_from_source(
        state.source.as_ref(),
        &request,
        &state.strategy,
        strategy::today_utc(),
    )
    .await
    {
        Ok(calc) => {
            state.counters.calculations_ok.fetch_add(1, Relaxed);
            let mut body = serde_json::json!(calc);
            if params.text.unwrap_or(false) {
                body["text"] = serde_json::Value::String(report::render_calculation(&calc));
            }
            (StatusCode::OK, Json(body))
        }
        Err(e) => error_response(&state, &e),
    }
}

/// GET /api/compare -- one quote, strikes for every allowed wing width
pub async fn get_compare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComparisonRequest>,
) -> ApiResponse {
    match strategy::compare_from_source(state.source.as_ref(), &params, &state.strategy).await {
        Ok((market, rows)) => {
            state.counters.comparisons.fetch_add(1, Relaxed);
            (
                StatusCode::OK,
                Json(serde_json::json!({ "market": market, "wings": rows })),
            )
        }
        Err(e) => error_response(&state, &e),
    }
}

/// GET /api/config -- strategy constants and active data source
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "strategy": state.strategy,
        "data_source": state.config.data_source,
        "source_name": state.source.name(),
        "underlying": state.config.index_symbol,
    }))
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "calculations_ok": state.counters.calculations_ok.load(Relaxed),
        "comparisons": state.counters.comparisons.load(Relaxed),
        "validation_errors": state.counters.validation_errors.load(Relaxed),
        "data_errors": state.counters.data_errors.load(Relaxed),
    }))
}
