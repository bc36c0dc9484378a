//! REST API for run results.
//!
//! Provides two GET endpoints:
//! - `/summary`: run parameters and per-profile totals
//! - `/results`: result rows with optional profile and time-range filtering

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::kpi::ProfileSummary;
use crate::sim::scenario::MultiplierGrid;
use crate::sim::types::ScenarioResult;

pub use types::{ErrorResponse, ResultRecord, ResultsQuery, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`; no locks
/// are needed since all data is read-only.
pub struct AppState {
    /// Turbine model name.
    pub turbine: String,
    /// PPA price used for the run (€/MWh).
    pub ppa_price: f64,
    /// Multiplier grid of the run.
    pub grid: MultiplierGrid,
    /// One summary per profile.
    pub summaries: Vec<ProfileSummary>,
    /// All result rows in output order.
    pub rows: Vec<ScenarioResult>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/results", get(handlers::get_results))
        .with_state(state)
}

/// Binds to the given address and serves the API until shutdown.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
