//! Per-call request descriptors.
//!
//! A [`RequestDescriptor`] is a snapshot of everything one verb call sends:
//! built fresh from a [`Resource`](crate::Resource) each time, never mutated
//! afterwards, and consumed by the round trip.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use url::Url;

use crate::config::BasicAuth;
use crate::error::{RestError, Result};
use crate::query::Query;
use crate::response::Response;

const JSON_CONTENT_TYPE: &str = "application/json";

/// An immutable, fully resolved request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    basic_auth: Option<BasicAuth>,
}

impl RequestDescriptor {
    pub(crate) fn new(
        method: Method,
        url: Url,
        headers: &[(String, String)],
        body: Option<Vec<u8>>,
        basic_auth: Option<BasicAuth>,
    ) -> Result<Self> {
        let mut map = HeaderMap::with_capacity(headers.len() + 1);
        for (name, value) in headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| RestError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| RestError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            map.append(header_name, header_value);
        }

        if body.is_some() && !map.contains_key(CONTENT_TYPE) {
            map.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        Ok(Self {
            method,
            url,
            headers: map,
            body,
            basic_auth,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn basic_auth(&self) -> Option<&BasicAuth> {
        self.basic_auth.as_ref()
    }

    /// Perform the round trip and buffer the response.
    pub(crate) async fn send(self, client: &Client) -> Result<Response> {
        let mut builder = client.request(self.method.clone(), self.url);

        // Explicit headers win over credentials, so apply credentials first.
        if let Some(auth) = &self.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        builder = builder.headers(self.headers);

        if let Some(body) = self.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        Response::read(self.method, response).await
    }
}

/// Join `path` and `suffix` onto `base` and attach `query`.
///
/// An empty `path` leaves the base path as written, trailing slash included.
/// Query parameters already on `base` are kept, repeated keys too, unless
/// `query` sets the same key.
pub(crate) fn resolve_url(base: &Url, path: &str, suffix: Option<&str>, query: &Query) -> Url {
    let mut url = base.clone();

    let mut full_path = if path.is_empty() {
        base.path().to_string()
    } else {
        format!("{}/{}", base.path().trim_end_matches('/'), path)
    };
    if let Some(suffix) = suffix {
        full_path.push_str(suffix);
    }
    url.set_path(&full_path);

    let mut merged = Query::new();
    for (key, value) in base.query_pairs() {
        merged.append(key, value);
    }
    merged.merge(query.clone());
    if merged.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&merged.encode()));
    }
    url.set_fragment(None);

    url
}
