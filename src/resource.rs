//! Resource nodes: path builder and request executor.

use std::fmt::Display;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RestError, Result};
use crate::query::Query;
use crate::request::{resolve_url, RequestDescriptor};
use crate::response::Response;
use crate::session::Session;
use crate::target::{Decode, Target};

/// A path under a [`Session`], plus whatever should be sent with it.
///
/// Path methods ([`child`](Self::child), [`id`](Self::id)) borrow the node
/// and return a new one, so a parent can be reused for many children.
/// Request options ([`query`](Self::query), [`header`](Self::header),
/// [`payload`](Self::payload), [`decode_into`](Self::decode_into)) consume
/// the node and return it. Verbs borrow the node and build a fresh
/// [`RequestDescriptor`] on every call; per-call arguments never stick to
/// the node.
///
/// # Example
///
/// ```no_run
/// use restnode::Target;
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Clone, Deserialize)]
/// struct User {
///     login: String,
/// }
///
/// # async fn example() -> restnode::Result<()> {
/// let api = restnode::api("https://api.github.com")?;
/// let user = Target::<User>::new();
///
/// // GET https://api.github.com/users/bndr
/// api.child("users").id("bndr").decode_into(&user).get().await?;
/// println!("{}", user.get().login);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Resource {
    session: Session,
    path: String,
    id: Option<String>,
    query: Query,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    target: Option<Arc<dyn Decode>>,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("base_url", &self.session.base_url().as_str())
            .field("path", &self.path)
            .field("id", &self.id)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

impl Resource {
    pub(crate) fn root(session: Session) -> Self {
        Self::at(session, String::new(), None, None)
    }

    fn at(
        session: Session,
        path: String,
        id: Option<String>,
        target: Option<Arc<dyn Decode>>,
    ) -> Self {
        Self {
            session,
            path,
            id,
            query: Query::new(),
            headers: Vec::new(),
            body: None,
            target,
        }
    }

    fn join(&self, segment: &str) -> String {
        if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}/{}", self.path, segment)
        }
    }

    /// A child resource at `self.path/segment`, with no decode target.
    pub fn child(&self, segment: impl AsRef<str>) -> Resource {
        Self::at(
            self.session.clone(),
            self.join(segment.as_ref()),
            None,
            None,
        )
    }

    /// A child resource at `self.path/value`.
    ///
    /// `value` is rendered with `Display`, so `id(123)` and `id("123")` name
    /// the same path. The new node shares this node's decode target.
    pub fn id(&self, value: impl Display) -> Resource {
        let id = value.to_string();
        Self::at(
            self.session.clone(),
            self.join(&id),
            Some(id),
            self.target.clone(),
        )
    }

    /// Decode successful responses into `target`.
    pub fn decode_into<T>(mut self, target: &Target<T>) -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.target = Some(target.sink());
        self
    }

    /// Merge `pairs` into the query parameters. The last value per key wins.
    pub fn query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.merge(pairs.into_iter().collect());
        self
    }

    /// Add a header value. Repeated names send every value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as JSON and send it with every verb on this node.
    ///
    /// Requests carrying a payload get `Content-Type: application/json`
    /// unless a `Content-Type` header was set explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Serialize`] if `body` cannot be encoded.
    pub fn payload<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(encode_payload(body)?);
        Ok(self)
    }

    /// The path relative to the session's base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The identifier segment, if this node was created by [`id`](Self::id).
    pub fn id_value(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn query_params(&self) -> &Query {
        &self.query
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Build the request a `method` call on this node would send.
    ///
    /// # Errors
    ///
    /// Returns an error if a pending header is invalid.
    pub fn request(&self, method: Method) -> Result<RequestDescriptor> {
        self.describe(method, None, None)
    }

    fn describe(
        &self,
        method: Method,
        extra_query: Option<Query>,
        body: Option<Vec<u8>>,
    ) -> Result<RequestDescriptor> {
        let mut query = self.query.clone();
        if let Some(extra) = extra_query {
            query.merge(extra);
        }

        let url = resolve_url(
            self.session.base_url(),
            &self.path,
            self.session.path_suffix(),
            &query,
        );

        RequestDescriptor::new(
            method,
            url,
            &self.headers,
            body.or_else(|| self.body.clone()),
            self.session.basic_auth().cloned(),
        )
    }

    /// Perform a GET request.
    pub async fn get(&self) -> Result<Response> {
        self.execute(Method::GET).await
    }

    /// Perform a GET request with extra query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidQuery`] without sending anything if
    /// `query` does not flatten into key/value pairs.
    pub async fn get_with<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Response> {
        self.execute_with_query(Method::GET, query).await
    }

    /// Perform a HEAD request.
    pub async fn head(&self) -> Result<Response> {
        self.execute(Method::HEAD).await
    }

    /// Perform a HEAD request with extra query parameters.
    pub async fn head_with<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Response> {
        self.execute_with_query(Method::HEAD, query).await
    }

    /// Perform a DELETE request.
    pub async fn delete(&self) -> Result<Response> {
        self.execute(Method::DELETE).await
    }

    /// Perform a DELETE request with extra query parameters.
    pub async fn delete_with<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Response> {
        self.execute_with_query(Method::DELETE, query).await
    }

    /// Perform an OPTIONS request.
    pub async fn options(&self) -> Result<Response> {
        self.execute(Method::OPTIONS).await
    }

    /// Perform an OPTIONS request with extra query parameters.
    pub async fn options_with<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Response> {
        self.execute_with_query(Method::OPTIONS, query).await
    }

    /// Perform a PUT request with the node's pending payload, if any.
    pub async fn put(&self) -> Result<Response> {
        self.execute(Method::PUT).await
    }

    /// Perform a PUT request with `body` as JSON payload.
    pub async fn put_with<B: Serialize + ?Sized>(&self, body: &B) -> Result<Response> {
        self.execute_with_payload(Method::PUT, body).await
    }

    /// Perform a POST request with the node's pending payload, if any.
    pub async fn post(&self) -> Result<Response> {
        self.execute(Method::POST).await
    }

    /// Perform a POST request with `body` as JSON payload.
    pub async fn post_with<B: Serialize + ?Sized>(&self, body: &B) -> Result<Response> {
        self.execute_with_payload(Method::POST, body).await
    }

    /// Perform a PATCH request with the node's pending payload, if any.
    pub async fn patch(&self) -> Result<Response> {
        self.execute(Method::PATCH).await
    }

    /// Perform a PATCH request with `body` as JSON payload.
    pub async fn patch_with<B: Serialize + ?Sized>(&self, body: &B) -> Result<Response> {
        self.execute_with_payload(Method::PATCH, body).await
    }

    /// Perform a request with an arbitrary method.
    pub async fn execute(&self, method: Method) -> Result<Response> {
        let request = self.describe(method, None, None)?;
        self.dispatch(request).await
    }

    async fn execute_with_query<Q: Serialize + ?Sized>(
        &self,
        method: Method,
        query: &Q,
    ) -> Result<Response> {
        let extra = Query::from_serialize(query)?;
        let request = self.describe(method, Some(extra), None)?;
        self.dispatch(request).await
    }

    async fn execute_with_payload<B: Serialize + ?Sized>(
        &self,
        method: Method,
        body: &B,
    ) -> Result<Response> {
        let body = encode_payload(body)?;
        let request = self.describe(method, None, Some(body))?;
        self.dispatch(request).await
    }

    /// Send `request` and decode a successful body into the target.
    #[tracing::instrument(
        skip(self, request),
        fields(method = %request.method(), url = %request.url())
    )]
    async fn dispatch(&self, request: RequestDescriptor) -> Result<Response> {
        tracing::debug!("sending request");
        let response = request.send(self.session.http()).await?;
        tracing::debug!(status = %response.status(), "received response");

        if !response.is_success() {
            tracing::debug!("non-success status, leaving body undecoded");
            return Ok(response);
        }

        let Some(target) = &self.target else {
            return Ok(response);
        };

        if response.body().iter().all(u8::is_ascii_whitespace) {
            return Ok(response);
        }

        match target.decode(response.body()) {
            Ok(()) => Ok(response),
            Err(source) => Err(RestError::Decode {
                source,
                response: Box::new(response),
            }),
        }
    }
}

fn encode_payload<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(RestError::Serialize)
}
