//! API sessions.
//!
//! A [`Session`] is the shared root every [`Resource`] descends from: the
//! base URL, credentials and HTTP client used for all requests.

use std::env;
use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::config::{BasicAuth, SessionConfig};
use crate::error::{RestError, Result};
use crate::resource::Resource;

const USER_AGENT: &str = concat!("restnode/", env!("CARGO_PKG_VERSION"));

/// Shared root context for a REST API.
///
/// This struct is cheaply cloneable; clones share the same HTTP client and
/// cookie jar.
///
/// # Example
///
/// ```no_run
/// use restnode::{Session, SessionConfig};
///
/// # fn example() -> restnode::Result<()> {
/// let session = Session::new(
///     "http://your-api-url.com/api/",
///     SessionConfig::new().with_basic_auth("username", "password"),
/// )?;
/// let users = session.root().child("users");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: Url,
    basic_auth: Option<BasicAuth>,
    http: Client,
    path_suffix: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.inner.base_url.as_str())
            .field("basic_auth", &self.inner.basic_auth)
            .field("path_suffix", &self.inner.path_suffix)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or cannot carry a
    /// path, or if the default HTTP client cannot be built.
    pub fn new(base_url: &str, config: SessionConfig) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(RestError::UrlError(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let http = match config.client {
            Some(client) => client,
            None => Self::default_client(&config)?,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                base_url,
                basic_auth: config.basic_auth,
                http,
                path_suffix: config.path_suffix.filter(|s| !s.is_empty()),
            }),
        })
    }

    /// Create a session from environment variables.
    ///
    /// Uses `RESTNODE_BASE_URL` for the base URL and
    /// [`SessionConfig::from_env`] for everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if `RESTNODE_BASE_URL` is not set or invalid.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("RESTNODE_BASE_URL").map_err(|_| {
            RestError::ConfigMissing("RESTNODE_BASE_URL environment variable not set".to_string())
        })?;

        Self::new(&base_url, SessionConfig::from_env()?)
    }

    fn default_client(config: &SessionConfig) -> Result<Client> {
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for this session");
        }

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_deref().unwrap_or(USER_AGENT))
            .cookie_store(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .brotli(true)
            .gzip(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(RestError::HttpError)
    }

    /// The root resource (empty path) of this session.
    pub fn root(&self) -> Resource {
        Resource::root(self.clone())
    }

    /// A session with the same base URL, credentials and suffix that sends
    /// requests through `client` instead.
    pub fn with_client(&self, client: Client) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url: self.inner.base_url.clone(),
                basic_auth: self.inner.basic_auth.clone(),
                http: client,
                path_suffix: self.inner.path_suffix.clone(),
            }),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn basic_auth(&self) -> Option<&BasicAuth> {
        self.inner.basic_auth.as_ref()
    }

    pub fn path_suffix(&self) -> Option<&str> {
        self.inner.path_suffix.as_deref()
    }

    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parses_base_url() {
        let session = Session::new("https://test-url.com", SessionConfig::default()).unwrap();
        assert_eq!(session.base_url().as_str(), "https://test-url.com/");
        assert!(session.basic_auth().is_none());
        assert!(session.path_suffix().is_none());
    }

    #[test]
    fn test_session_rejects_invalid_url() {
        let err = Session::new("not a url", SessionConfig::default()).unwrap_err();
        assert!(matches!(err, RestError::UrlError(_)));
    }

    #[test]
    fn test_session_rejects_cannot_be_a_base_url() {
        let err = Session::new("mailto:someone@example.com", SessionConfig::default()).unwrap_err();
        assert!(matches!(err, RestError::UrlError(_)));
    }

    #[test]
    fn test_session_keeps_auth() {
        let config = SessionConfig::new().with_basic_auth("username", "password");
        let session = Session::new("https://test-url.com", config).unwrap();

        let auth = session.basic_auth().unwrap();
        assert_eq!(auth.username, "username");
        assert_eq!(auth.password, "password");
    }

    #[test]
    fn test_session_debug_hides_password() {
        let config = SessionConfig::new().with_basic_auth("username", "s3cret");
        let session = Session::new("https://test-url.com", config).unwrap();

        let debug = format!("{:?}", session);
        assert!(debug.contains("Session"));
        assert!(debug.contains("base_url"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_empty_suffix_is_ignored() {
        let config = SessionConfig::new().with_path_suffix("");
        let session = Session::new("https://test-url.com", config).unwrap();
        assert!(session.path_suffix().is_none());
    }

    #[test]
    fn test_with_client_keeps_settings() {
        let config = SessionConfig::new()
            .with_basic_auth("username", "password")
            .with_path_suffix(".json");
        let session = Session::new("https://test-url.com/api", config).unwrap();

        let swapped = session.with_client(Client::new());

        assert_eq!(swapped.base_url(), session.base_url());
        assert_eq!(swapped.basic_auth(), session.basic_auth());
        assert_eq!(swapped.path_suffix(), Some(".json"));
    }
}
