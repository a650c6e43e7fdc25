// crates/server/src/routes/analytics.rs
//! Analytics endpoints: the time-bucketed traffic summary powering the
//! chart and stat cards, and the breakdown tables.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use siteview_core::{breakdowns, summarize, Breakdowns, TimeRange, TrafficSummary};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    /// Range keyword; the dashboard opens on the weekly view.
    pub range: Option<String>,
}

/// GET /api/analytics/summary?range= - Bucketed series plus the three
/// headline stats (unique visitors, total visitors, visit duration) with
/// their percent change versus the previous period.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> ApiResult<Json<TrafficSummary>> {
    let range: TimeRange = params.range.as_deref().unwrap_or("week").parse()?;
    Ok(Json(summarize(&state.pages, range, Utc::now())))
}

/// GET /api/analytics/breakdowns - Top pages, referrers, locations and
/// devices, plus the map markers.
pub async fn get_breakdowns(State(state): State<Arc<AppState>>) -> Json<Breakdowns> {
    Json(breakdowns(&state.pages))
}

/// Create the analytics routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics/summary", get(get_summary))
        .route("/analytics/breakdowns", get(get_breakdowns))
}
