//! Mock REST API server.
//!
//! Provides an axum-based HTTP server that echoes requests and serves a small
//! user directory.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::{MockState, RecordedRequest};

/// A mock REST API server for testing.
///
/// The server runs in the background and records every request it receives.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with no users.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    /// The most recently received request.
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.state.read().await.last_request().cloned()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Fixtures::default_users()
            .into_iter()
            .fold(MockState::new(), MockState::with_user)
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/users/:login", get(handlers::get_user))
            .route("/status/:code", any(handlers::status))
            .route("/cookies", get(handlers::get_cookies))
            .route("/cookies/set", get(handlers::set_cookies))
            .route("/health", get(handlers::health_check))
            .fallback(handlers::echo)
            .layer(middleware::from_fn_with_state(state.clone(), handlers::record))
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_router_serves_fixture_user() {
        let state = MockServer::default_state().shared();
        let router = MockServer::create_router(state);

        let request = Request::get("/users/bndr").body(Body::empty()).unwrap();
        let (status, json) = call(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["login"], "bndr");
        assert_eq!(json["id"], 1145456);
    }

    #[tokio::test]
    async fn test_router_unknown_user_is_404() {
        let router = MockServer::create_router(MockState::new().shared());

        let request = Request::get("/users/nobody").body(Body::empty()).unwrap();
        let (status, json) = call(router, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_router_echoes_and_records() {
        let state = MockState::new().shared();
        let router = MockServer::create_router(state.clone());

        let request = Request::post("/items/123?page=1")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"Key":"Value1"}"#))
            .unwrap();
        let (status, json) = call(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["method"], "POST");
        assert_eq!(json["path"], "/items/123");
        assert_eq!(json["args"]["page"], "1");
        assert_eq!(json["json"]["Key"], "Value1");

        let state = state.read().await;
        let recorded = state.last_request().unwrap();
        assert_eq!(recorded.method, "POST");
        assert_eq!(recorded.query.as_deref(), Some("page=1"));
        assert_eq!(recorded.body, br#"{"Key":"Value1"}"#);
    }

    #[tokio::test]
    async fn test_router_status_endpoint() {
        let router = MockServer::create_router(MockState::new().shared());

        let request = Request::get("/status/503").body(Body::empty()).unwrap();
        let (status, json) = call(router, request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["message"], "Service Unavailable");
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let response = reqwest::get(format!("{}/health", server.url()))
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }
}
