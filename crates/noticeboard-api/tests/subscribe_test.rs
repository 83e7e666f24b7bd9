//! Integration tests for the subscriber registration endpoint.
//!
//! Drives `POST /subscribers` through the full router with the core crate's
//! in-memory collaborators, covering deduplication, idempotent
//! re-subscription, and per-step fault mapping.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use noticeboard_api::{create_router, AppState, DocumentKeys};
use noticeboard_core::{
    notify::mock::RecordingNotifier, store::mock::MemoryObjectStore, NotifyError, StoreError,
};
use serde_json::Value;
use tower::ServiceExt;

fn test_state() -> (AppState, MemoryObjectStore, RecordingNotifier) {
    let store = MemoryObjectStore::new();
    let notifier = RecordingNotifier::new();
    let state = AppState {
        store: Arc::new(store.clone()),
        notifier: Arc::new(notifier.clone()),
        keys: DocumentKeys {
            events: "events.json".to_string(),
            subscribers: "subscribers.json".to_string(),
        },
    };
    (state, store, notifier)
}

async fn post_subscribers(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/subscribers")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("build request");

    let response = app.oneshot(request).await.expect("execute request");
    let status = response.status();
    let bytes =
        axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read response body");
    let body: Value = serde_json::from_slice(&bytes).expect("parse response json");
    (status, body)
}

async fn stored_subscribers(store: &MemoryObjectStore) -> Vec<String> {
    let raw = store.object("subscribers.json").await.expect("subscribers document exists");
    serde_json::from_slice(&raw).expect("subscribers document is a JSON array")
}

#[tokio::test]
async fn first_subscription_persists_and_registers() {
    let (state, store, notifier) = test_state();

    let (status, body) = post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "a@x.com adicionado com sucesso!");
    assert_eq!(stored_subscribers(&store).await, vec!["a@x.com".to_string()]);
    assert_eq!(notifier.subscriptions().await, vec!["a@x.com".to_string()]);
}

#[tokio::test]
async fn resubscription_skips_write_but_still_registers() {
    let (state, store, notifier) = test_state();

    let (first, _) = post_subscribers(create_router(state.clone()), r#"{"email":"a@x.com"}"#).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(store.put_count().await, 1);

    let (second, body) = post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;
    assert_eq!(second, StatusCode::OK);
    assert_eq!(body["message"], "a@x.com adicionado com sucesso!");

    // No rewrite of unchanged storage content, but the notifier is still
    // asked to register the endpoint again.
    assert_eq!(store.put_count().await, 1);
    assert_eq!(stored_subscribers(&store).await, vec!["a@x.com".to_string()]);
    assert_eq!(notifier.subscriptions().await.len(), 2);
}

#[tokio::test]
async fn dedup_is_case_sensitive() {
    let (state, store, _notifier) = test_state();

    post_subscribers(create_router(state.clone()), r#"{"email":"A@x.com"}"#).await;
    post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;

    assert_eq!(
        stored_subscribers(&store).await,
        vec!["A@x.com".to_string(), "a@x.com".to_string()]
    );
}

#[tokio::test]
async fn empty_document_behaves_like_missing_document() {
    let (state, store, _notifier) = test_state();
    store.seed("subscribers.json", "[]", "application/json").await;

    let (status, _) = post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_subscribers(&store).await, vec!["a@x.com".to_string()]);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (state, store, notifier) = test_state();

    let (status, body) = post_subscribers(create_router(state), "not-json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Corpo da requisição inválido ou ausente");
    assert_eq!(store.put_count().await, 0);
    assert!(notifier.subscriptions().await.is_empty());
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let (state, _store, _notifier) = test_state();

    let (status, body) = post_subscribers(create_router(state), Body::empty()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Corpo da requisição inválido ou ausente");
}

#[tokio::test]
async fn missing_email_is_rejected() {
    let (state, _store, _notifier) = test_state();

    let (status, body) = post_subscribers(create_router(state), "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email é obrigatório");
}

#[tokio::test]
async fn empty_email_is_rejected() {
    let (state, _store, _notifier) = test_state();

    let (status, body) = post_subscribers(create_router(state), r#"{"email":""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email é obrigatório");
}

#[tokio::test]
async fn non_string_email_is_rejected() {
    let (state, _store, _notifier) = test_state();

    let (status, body) = post_subscribers(create_router(state), r#"{"email":42}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email é obrigatório");
}

#[tokio::test]
async fn read_fault_stops_before_any_side_effect() {
    let (state, store, notifier) = test_state();
    store.inject_get_error(StoreError::transport("connection refused")).await;

    let (status, body) = post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro ao acessar o armazenamento");
    assert_eq!(store.put_count().await, 0);
    assert!(notifier.subscriptions().await.is_empty());
}

#[tokio::test]
async fn write_fault_stops_before_subscription() {
    let (state, store, notifier) = test_state();
    store.inject_put_error(StoreError::UnexpectedStatus { status: 503 }).await;

    let (status, body) = post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro ao salvar inscrição");
    assert!(notifier.subscriptions().await.is_empty());
}

#[tokio::test]
async fn subscription_fault_leaves_list_persisted() {
    let (state, store, notifier) = test_state();
    notifier.inject_subscribe_error(NotifyError::UnexpectedStatus { status: 502 }).await;

    let (status, body) = post_subscribers(create_router(state), r#"{"email":"a@x.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro ao inscrever no tópico de notificações");
    assert_eq!(stored_subscribers(&store).await, vec!["a@x.com".to_string()]);
}
