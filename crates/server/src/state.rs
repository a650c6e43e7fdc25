// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use siteview_types::PageAnalytics;

/// Shared application state accessible from all route handlers.
///
/// The analytics export is loaded once at startup and never mutated;
/// aggregates are recomputed per request and nothing derived is persisted.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// The raw per-page analytics records from the document-store export.
    pub pages: Vec<PageAnalytics>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(pages: Vec<PageAnalytics>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            pages,
        })
    }
}
