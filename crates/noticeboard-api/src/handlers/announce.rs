//! Event publication handler.
//!
//! Validates an incoming event payload, appends it to the persisted event
//! list, and broadcasts a notification to the announcement topic. The
//! notification is sent only after the list write succeeds
//! (notify-after-commit), so a publish fault leaves the event persisted
//! without a notification and no compensation is attempted.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use noticeboard_core::{documents, Publication};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::{error_response, MessageResponse};
use crate::server::AppState;

/// Subject line attached to every event notification.
const NOTIFICATION_SUBJECT: &str = "Novo Evento Disponível!";

/// Publishes a new event announcement.
///
/// Accepts an arbitrary JSON object that must carry non-empty `title` and
/// `date` fields; extra fields are preserved verbatim in the persisted
/// record.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: unparseable body or missing required fields (no side effects)
/// - 500: storage read/write or notification fault
#[instrument(name = "create_event", skip(state, body))]
pub async fn create_event(State(state): State<AppState>, body: Bytes) -> Response {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Request body is not valid JSON");
            return error_response(StatusCode::BAD_REQUEST, "JSON inválido");
        },
    };

    if !is_truthy(event.get("title")) || !is_truthy(event.get("date")) {
        warn!("Event payload missing title or date");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Campos \"title\" e \"date\" são obrigatórios",
        );
    }

    let mut events =
        match documents::load_list::<Value>(state.store.as_ref(), &state.keys.events).await {
            Ok(events) => events,
            Err(e) => {
                error!(error = %e, "Failed to read event list");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao acessar o armazenamento",
                );
            },
        };

    debug!(existing = events.len(), "Appending event to list");

    let title = display_field(&event, "title");
    let date = display_field(&event, "date");
    events.push(event);

    if let Err(e) = documents::save_list(state.store.as_ref(), &state.keys.events, &events).await {
        error!(error = %e, "Failed to persist event list");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao salvar o evento");
    }

    let publication = Publication {
        subject: NOTIFICATION_SUBJECT.to_string(),
        message: format!("Novo evento cadastrado: {title} em {date}"),
    };

    if let Err(e) = state.notifier.publish(publication).await {
        error!(error = %e, "Failed to publish event notification");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao publicar a notificação");
    }

    info!(%title, %date, "Event published and notification sent");

    (
        StatusCode::OK,
        Json(MessageResponse { message: "Evento criado e notificação enviada!".to_string() }),
    )
        .into_response()
}

/// Whether a field counts as present.
///
/// Missing, null, empty string, `false`, zero, and empty containers all
/// count as absent, matching the original service's falsy check.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

/// Renders a field for the notification text: strings unquoted, anything
/// else in its JSON form.
fn display_field(event: &Value, key: &str) -> String {
    match event.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
