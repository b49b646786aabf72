//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use taskboard::api::{AppState, create_router};
use taskboard::infrastructure::{InMemoryStore, SnapshotStore};

// =============================================================================
// App Helpers
// =============================================================================

/// Creates a router over an empty in-memory store.
pub fn create_test_app() -> Router {
    create_app_with_store(Arc::new(InMemoryStore::new()))
}

/// Creates a router over `store`.
pub fn create_app_with_store(store: Arc<dyn SnapshotStore>) -> Router {
    create_router(AppState::from_store(store))
}

/// Sends one request through `app` and returns the status and JSON body.
///
/// An empty response body decodes as `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// Sends a prepared request through `app`.
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// =============================================================================
// Live Server
// =============================================================================

/// Serves `app` on an ephemeral local port and returns its address.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    address
}
