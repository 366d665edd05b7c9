//! HTTP routes: the landing page and the metrics endpoint.

use axum::{Router, routing::get};

use crate::state::SharedState;

pub mod landing;
pub mod metrics;

/// Builds the router. Paths other than `/` and `metrics_path` answer 404.
pub fn router(state: SharedState, metrics_path: &str) -> Router {
    Router::new()
        .route("/", get(landing::landing))
        .route(metrics_path, get(metrics::metrics))
        .with_state(state)
}
