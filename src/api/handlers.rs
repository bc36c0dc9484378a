//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, ResultRecord, ResultsQuery, SummaryResponse};

/// Returns run parameters and per-profile summaries.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        turbine: state.turbine.clone(),
        ppa_price: state.ppa_price,
        multipliers: state.grid.values().to_vec(),
        profiles: state.summaries.clone(),
    })
}

/// Returns result rows, optionally filtered by profile and time range.
///
/// `GET /results` → 200 + `Vec<ResultRecord>` JSON
/// `GET /results?profile_id=2&from=2019-01-01T06:00:00Z&to=2019-01-01T12:00:00Z` → filtered (inclusive)
/// `GET /results?from=<later>&to=<earlier>` → 400 + `ErrorResponse`
pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResultsQuery>,
) -> impl IntoResponse {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<ResultRecord> = state
        .rows
        .iter()
        .filter(|r| query.profile_id.is_none_or(|id| r.profile.profile_id == id))
        .filter(|r| query.from.is_none_or(|from| r.timestamp >= from))
        .filter(|r| query.to.is_none_or(|to| r.timestamp <= to))
        .map(ResultRecord::from)
        .collect();

    Ok(Json(records))
}
