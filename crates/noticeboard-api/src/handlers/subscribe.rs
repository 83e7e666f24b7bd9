//! Subscriber registration handler.
//!
//! Validates an incoming subscriber payload, appends the email to the
//! persisted subscriber list if it is not already present, and registers the
//! email as an email-protocol endpoint on the announcement topic.
//! Re-subscribing an existing email skips the storage write entirely but
//! still re-registers with the notifier, making the operation idempotent.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use noticeboard_core::documents;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::{error_response, MessageResponse};
use crate::server::AppState;

/// Registers an email subscriber for event announcements.
///
/// Accepts `{"email": string}`. Deduplication is an exact, case-sensitive
/// string match against the persisted list.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: missing/unparseable body or missing email (no side effects)
/// - 500: storage read/write or subscription fault, each with its own
///   fixed message
#[instrument(name = "register_subscriber", skip(state, body))]
pub async fn register_subscriber(State(state): State<AppState>, body: Bytes) -> Response {
    // Missing and malformed bodies collapse into one bad-request condition.
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Request body missing or not valid JSON");
            return error_response(StatusCode::BAD_REQUEST, "Corpo da requisição inválido ou ausente");
        },
    };

    let email = match payload.get("email").and_then(Value::as_str) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            warn!("Subscriber payload missing email");
            return error_response(StatusCode::BAD_REQUEST, "Email é obrigatório");
        },
    };

    let mut subscribers =
        match documents::load_list::<String>(state.store.as_ref(), &state.keys.subscribers).await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!(error = %e, "Failed to read subscriber list");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao acessar o armazenamento",
                );
            },
        };

    if subscribers.iter().any(|existing| existing == &email) {
        debug!("Email already subscribed, skipping storage write");
    } else {
        subscribers.push(email.clone());

        if let Err(e) =
            documents::save_list(state.store.as_ref(), &state.keys.subscribers, &subscribers).await
        {
            error!(error = %e, "Failed to persist subscriber list");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao salvar inscrição");
        }
    }

    if let Err(e) = state.notifier.subscribe_email(email.clone()).await {
        error!(error = %e, "Failed to register subscriber with notifier");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Erro ao inscrever no tópico de notificações",
        );
    }

    info!("Subscriber registered");

    (StatusCode::OK, Json(MessageResponse { message: format!("{email} adicionado com sucesso!") }))
        .into_response()
}
