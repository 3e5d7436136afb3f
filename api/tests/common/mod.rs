// tests/common/mod.rs
//
// Shared helpers for driving the full router without binding a socket.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

use echo_api::observability::Observability;
use echo_api::state::AppState;

pub fn app() -> Router {
    let registry = Observability::registry().expect("metric registry");
    echo_api::app(AppState::new(registry))
}

pub async fn respond(request: Request<Body>) -> Response {
    app().oneshot(request).await.expect("router is infallible")
}

pub async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = respond(request).await;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}

pub async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(uri: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(uri, body.to_string()).await
}

pub async fn post_raw(uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    post_as(uri, "application/json", body).await
}

pub async fn post_as(uri: &str, content_type: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap(),
    )
    .await
}

/// Field paths of a 422 response, in reported order
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Constraint types of a 422 response, in reported order
pub fn error_constraints(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["constraint"]["type"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
