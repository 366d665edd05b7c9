//! Shared application state.

use std::sync::Arc;

use iri_exporter::MetricsRegistry;

/// State shared by the request handlers.
///
/// This is wrapped in an [`Arc`] and passed to handlers via Axum's `State`
/// extractor.
pub struct AppState {
    /// Registry whose gathering scrapes the node.
    pub metrics: Arc<MetricsRegistry>,
    /// Pre-rendered HTML served at `/`.
    pub landing_page: String,
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
