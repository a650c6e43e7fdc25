// crates/server/src/routes/mod.rs
//! API route modules.

pub mod analytics;
pub mod health;
pub mod services;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Assemble all API routes under the `/api` prefix.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(health::router())
                .merge(analytics::router())
                .merge(services::router()),
        )
        .with_state(state)
}
