#![allow(dead_code)]

//! Request helpers for driving the full router with `oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use ticketing_api::{create_api_router, ApiConfig, AppState, SharedStore};
use ticketing_test_utils::InMemoryTicketStore;
use tower::ServiceExt;

/// Full router over a fresh in-memory store.
pub fn memory_app() -> Router {
    app_with_store(Arc::new(InMemoryTicketStore::new()))
}

pub fn app_with_store(store: SharedStore) -> Router {
    create_api_router(AppState::new(store), &ApiConfig::default())
}

/// Send a request and decode the response body as JSON (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value), String> {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    send_raw(app, method, uri, body).await
}

/// Send a request with an arbitrary body.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Body,
) -> Result<(StatusCode, Value), String> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .map_err(|e| e.to_string())?;

    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| format!("Request failed: {:?}", e))?;

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| e.to_string())?;

    if bytes.is_empty() {
        return Ok((status, Value::Null));
    }
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    Ok((status, json))
}
