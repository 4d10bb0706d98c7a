//! Buffered HTTP responses.

use std::borrow::Cow;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{RestError, Result};

/// The raw result of one round trip.
///
/// The body is read in full before the response is handed back, so it stays
/// readable regardless of the status code or of whether it was decoded.
#[derive(Debug, Clone)]
pub struct Response {
    method: Method,
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub(crate) async fn read(method: Method, response: reqwest::Response) -> Result<Self> {
        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(Self {
            method,
            url,
            status,
            headers,
            body,
        })
    }

    /// The method of the request that produced this response.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The final URL, after any redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON, regardless of status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| RestError::Decode {
            source,
            response: Box::new(self.clone()),
        })
    }

    /// Turn a non-success response into [`RestError::Status`].
    ///
    /// If the body is a JSON object with a `message` or `error` string, that
    /// string is used as the error body; otherwise the raw text is.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        Err(RestError::Status {
            status: self.status,
            body: self.error_message(),
        })
    }

    fn error_message(&self) -> String {
        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        self.text().into_owned()
    }

    #[cfg(test)]
    pub(crate) fn stub(status: u16, body: &str) -> Self {
        Self {
            method: Method::GET,
            url: Url::parse("https://test-url.com/users").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }
}
