// crates/server/src/routes/services.rs
//! Service-expiration endpoint.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use siteview_types::ServiceStatus;

use crate::services::service_statuses_from_env;
use crate::state::AppState;

/// GET /api/services - Third-party service expiration status, soonest
/// expiry first.
pub async fn get_services() -> Json<Vec<ServiceStatus>> {
    Json(service_statuses_from_env())
}

/// Create the services routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/services", get(get_services))
}
