//! Router-level helpers for handler tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    app::build_app,
    profiles::extractors::PROFILE_HEADER,
    state::AppState,
    store::{fixtures, memory::MemoryStore},
};

pub fn demo_store() -> MemoryStore {
    MemoryStore::from_dataset(fixtures::demo())
}

pub fn app_with(store: MemoryStore) -> Router {
    build_app(AppState::fake(store))
}

/// Sends one request and returns the status with the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    profile_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = profile_id {
        builder = builder.header(PROFILE_HEADER, id.to_string());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let res = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, profile_id: Option<i64>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, profile_id, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    profile_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send(app, Method::POST, uri, profile_id, body).await
}
