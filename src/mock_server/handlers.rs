//! Endpoint handlers for the mock server.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use url::form_urlencoded;

use super::state::{MockState, RecordedRequest};

type SharedState = Arc<RwLock<MockState>>;

/// Middleware that records every request before it reaches a handler.
pub async fn record(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    state
        .write()
        .await
        .record(RecordedRequest::from_parts(&parts, &bytes));

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Any unmatched route: echo the request back as JSON.
pub async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let args: BTreeMap<String, String> = uri
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        header_map
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let decoded_path = urlencoding::decode(uri.path())
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| uri.path().to_string());

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "decoded_path": decoded_path,
        "args": args,
        "headers": header_map,
        "data": String::from_utf8_lossy(&body),
        "json": serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null),
    }))
}

/// GET /users/{login}
pub async fn get_user(
    State(state): State<SharedState>,
    Path(login): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state.get_user(&login) {
        Some(user) => (StatusCode::OK, Json(json!(user))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": "Not Found",
                "documentation_url": "https://developer.github.com/v3"
            })),
        )
            .into_response(),
    }
}

/// ANY /status/{code}
pub async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let reason = status.canonical_reason().unwrap_or("Unknown");
    (status, Json(json!({ "message": reason })))
}

/// GET /cookies/set?name=value
pub async fn set_cookies(Query(cookies): Query<BTreeMap<String, String>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    for (name, value) in &cookies {
        if let Ok(cookie) = HeaderValue::from_str(&format!("{name}={value}; Path=/")) {
            headers.append(header::SET_COOKIE, cookie);
        }
    }
    (headers, Json(json!({ "cookies": cookies })))
}

/// GET /cookies
pub async fn get_cookies(headers: HeaderMap) -> Json<Value> {
    let cookies: BTreeMap<String, String> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Json(json!({ "cookies": cookies }))
}

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "ok"
}
