// crates/server/src/lib.rs
//! Siteview server library.
//!
//! This crate provides the Axum-based HTTP server for the siteview
//! dashboard. It serves a REST API for the traffic summary (bucketed series
//! + trend stats), breakdown tables and service-expiration status, computed
//! from the analytics export loaded at startup.

pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use siteview_types::PageAnalytics;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, analytics, services)
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(pages: Vec<PageAnalytics>) -> Router {
    let state: Arc<AppState> = AppState::new(pages);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
