// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use serde_json::{Map, Value};
use std::sync::Arc;
use workout_tracker::config::Config;
use workout_tracker::db::{MemoryMedium, RecordStore};
use workout_tracker::routes::create_router;
use workout_tracker::AppState;

/// Create an unseeded store over a fresh in-memory medium.
/// Returns the medium too so tests can inspect or corrupt raw storage.
#[allow(dead_code)]
pub fn test_store() -> (RecordStore, Arc<MemoryMedium>) {
    let medium = Arc::new(MemoryMedium::new());
    (RecordStore::new(medium.clone()), medium)
}

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let (store, _) = test_store();
    let state = Arc::new(AppState::new(Config::test_default(), store));
    (create_router(state.clone()), state)
}

/// Build a JSON object from a `json!` literal.
#[allow(dead_code)]
pub fn object(value: Value) -> Map<String, Value> {
    value
        .as_object()
        .cloned()
        .expect("test fixture must be a JSON object")
}

/// Build a request with an optional JSON body.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
