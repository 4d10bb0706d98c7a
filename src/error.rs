//! Error types for resource requests.

use reqwest::StatusCode;
use thiserror::Error;

use crate::response::Response;

/// Errors that can occur while building or executing a request.
#[derive(Debug, Error)]
pub enum RestError {
    /// Configuration is missing or incomplete.
    #[error("configuration required: {0}")]
    ConfigMissing(String),

    /// A configuration value is present but malformed.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A value passed as a query could not be flattened into key/value pairs.
    #[error("can't use {0} as query")]
    InvalidQuery(String),

    /// A pending header had an invalid name or value.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The request payload could not be encoded as JSON.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A successful response carried a body that did not decode into the target.
    ///
    /// The raw response is kept so callers can still inspect it.
    #[error("Failed to parse response from {}: {source}", .response.url())]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Box<Response>,
    },

    /// The server answered with a non-success status.
    ///
    /// Only produced by [`Response::error_for_status`].
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl RestError {
    /// The raw response attached to this error, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Decode { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { response, .. } => Some(response.status()),
            Self::Status { status, .. } => Some(*status),
            Self::HttpError(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type alias for resource operations.
pub type Result<T> = core::result::Result<T, RestError>;
