//! Fluent resource builder for REST APIs.
//!
//! Compose a URL from path segments, attach query parameters, headers and a
//! JSON payload, perform one HTTP round trip, and decode the JSON response
//! into a caller-supplied [`Target`].
//!
//! # Quick Start
//!
//! ```no_run
//! use restnode::{SessionConfig, Target};
//! use serde::Deserialize;
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Default, Clone, Deserialize)]
//! struct Item {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> restnode::Result<()> {
//!     let api = restnode::api_with(
//!         "http://your-api-url.com/api/",
//!         SessionConfig::new().with_basic_auth("username", "password"),
//!     )?;
//!
//!     // GET http://your-api-url.com/api/users/123/items?page=100&per_page=1000
//!     let items = Target::<Vec<Item>>::new();
//!     api.child("users")
//!         .id(123)
//!         .child("items")
//!         .decode_into(&items)
//!         .get_with(&HashMap::from([("page", "100"), ("per_page", "1000")]))
//!         .await?;
//!     println!("Found {} items", items.get().len());
//!
//!     // POST http://your-api-url.com/api/items/123 with a JSON payload
//!     let created = Target::<serde_json::Value>::new();
//!     let response = api
//!         .child("items")
//!         .decode_into(&created)
//!         .id(123)
//!         .post_with(&HashMap::from([("Key", "Value1")]))
//!         .await?;
//!     println!("{} -> {:?}", response.status(), created.get());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Session`] - base URL, credentials, HTTP client and path suffix,
//!   shared by every resource created from it
//! - [`Resource`] - a path under a session; chains into child resources and
//!   issues verbs
//! - [`RequestDescriptor`] - the immutable request one verb call sends
//! - [`Response`] - the buffered raw response
//!
//! Non-success statuses are not errors: the body is left undecoded and the
//! [`Response`] is returned as-is. Use [`Response::error_for_status`] to opt
//! into an error.
//!
//! # Configuration
//!
//! [`Session::from_env`] reads:
//!
//! - `RESTNODE_BASE_URL` (required) - the API root
//! - `RESTNODE_USERNAME` / `RESTNODE_PASSWORD` (optional) - basic auth
//! - `RESTNODE_PATH_SUFFIX` (optional) - appended to every path, e.g. `.json`
//! - `RESTNODE_INSECURE` (optional) - `1` or `true` skips certificate checks
//! - `RESTNODE_TIMEOUT_SECS` (optional) - request timeout

pub mod cli;
mod config;
mod error;
pub mod output;
mod query;
mod request;
mod resource;
mod response;
mod session;
mod target;

#[cfg(feature = "test-server")]
pub mod mock_server;

pub use config::{BasicAuth, SessionConfig};
pub use error::{RestError, Result};
pub use query::Query;
pub use request::RequestDescriptor;
pub use resource::Resource;
pub use response::Response;
pub use session::Session;
pub use target::Target;

pub use reqwest::{Method, StatusCode};

/// Create a session with default configuration and return its root resource.
///
/// # Errors
///
/// Returns an error if `base_url` is not a valid URL.
pub fn api(base_url: &str) -> Result<Resource> {
    api_with(base_url, SessionConfig::default())
}

/// Create a session with `config` and return its root resource.
///
/// # Errors
///
/// Returns an error if `base_url` is not a valid URL or the HTTP client
/// cannot be built.
pub fn api_with(base_url: &str, config: SessionConfig) -> Result<Resource> {
    Ok(Session::new(base_url, config)?.root())
}
