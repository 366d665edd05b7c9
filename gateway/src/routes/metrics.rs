use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use iri_exporter::CONTENT_TYPE;

use crate::state::SharedState;

/// `GET <telemetry path>`
///
/// Scrapes the node and returns every metric in the Prometheus text format.
/// The scrape uses a blocking HTTP client, so it runs on the blocking pool;
/// the response is held until it completes. Upstream failures never fail
/// the request, they only leave the affected metrics at their last values.
pub async fn metrics(State(state): State<SharedState>) -> Response {
    let registry = state.metrics.clone();

    match tokio::task::spawn_blocking(move || registry.gather_text()).await {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "scrape task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "scrape failed").into_response()
        }
    }
}
