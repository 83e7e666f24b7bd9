//! HTTP request handlers for the noticeboard API.
//!
//! Both domain handlers follow the same linear pipeline:
//! parse → validate → fetch current list → merge → persist → notify →
//! respond. Client input errors are terminal 400s with no side effects;
//! infrastructure faults map to structured 500s with fixed user-facing
//! messages. There are no retries and no compensation — a failure after
//! persistence leaves the list updated without the notification.
//!
//! # Handler Organization
//!
//! - `announce` - event publication
//! - `subscribe` - subscriber registration
//! - `health` - liveness probe

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub mod announce;
pub mod health;
pub mod subscribe;

// Re-export handlers for convenient access
pub use announce::create_event;
pub use health::health_check;
pub use subscribe::register_subscriber;

/// Success response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation message for the caller
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Fixed user-facing error message
    pub error: String,
}

/// Creates a standardized error response.
fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_status_and_message() {
        let response = error_response(StatusCode::BAD_REQUEST, "JSON inválido");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
