//! Liveness probe.
//!
//! Returns a minimal response indicating the service process is alive. The
//! collaborators are remote services called lazily per request, and an
//! absent list document is a healthy first-run state, so there is nothing
//! meaningful to probe beyond the HTTP server itself.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{debug, instrument};

/// Liveness check endpoint handler.
#[instrument(name = "health_check")]
pub async fn health_check() -> Response {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "service": "noticeboard",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response)).into_response()
}
