//! Mock REST API server for E2E testing.
//!
//! An in-process axum server that echoes requests back as JSON (method,
//! path, query arguments, headers, body), serves a small user directory,
//! answers with arbitrary status codes and sets cookies. Every request is
//! recorded so tests can assert on exactly what went over the wire.
//!
//! Unlike wiremock, which matches requests per test, this server works for
//! any path, which suits tests that build paths dynamically.
//!
//! # Example
//!
//! ```ignore
//! use restnode::mock_server::MockServer;
//! use restnode::Target;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let api = restnode::api(server.url()).unwrap();
//!
//!     let user = Target::<serde_json::Value>::new();
//!     api.child("users").id("bndr").decode_into(&user).get().await.unwrap();
//!     assert_eq!(user.get()["login"], "bndr");
//!
//!     server.shutdown().await;
//! }
//! ```
//!
//! Routes:
//!
//! - `GET /users/{login}` - a fixture user, or 404
//! - `ANY /status/{code}` - responds with `code` and `{"message": reason}`
//! - `GET /cookies/set?name=value` - sets the given cookies
//! - `GET /cookies` - echoes the cookies the client sent
//! - `GET /health` - `ok`
//! - anything else - echo

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::{MockState, MockUser, RecordedRequest};
