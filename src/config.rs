//! Session configuration.
//!
//! [`SessionConfig`] collects everything a [`Session`](crate::Session) can be
//! tuned with. All fields are optional; `SessionConfig::default()` gives a
//! session with no credentials, no path suffix and a freshly built HTTP
//! client that verifies certificates.

use std::env;
use std::time::Duration;

use reqwest::Client;

use crate::error::{RestError, Result};

/// Credentials sent as an HTTP `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse a `user:password` pair. A missing `:` means an empty password.
    pub fn parse(pair: &str) -> Self {
        match pair.split_once(':') {
            Some((user, password)) => Self::new(user, password),
            None => Self::new(pair, ""),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Options applied once when a session is created.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Credentials applied to every request.
    pub basic_auth: Option<BasicAuth>,

    /// A pre-built client, e.g. one whose middleware handles OAuth tokens.
    ///
    /// When set, `accept_invalid_certs`, `timeout` and `user_agent` are
    /// ignored: the client is used as-is.
    pub client: Option<Client>,

    /// Appended to every generated path (e.g. `.json`).
    pub path_suffix: Option<String>,

    /// Skip TLS certificate verification on the default client.
    pub accept_invalid_certs: bool,

    /// Total request timeout for the default client.
    pub timeout: Option<Duration>,

    /// User agent for the default client.
    pub user_agent: Option<String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from environment variables.
    ///
    /// - `RESTNODE_USERNAME` / `RESTNODE_PASSWORD` - basic auth credentials
    /// - `RESTNODE_PATH_SUFFIX` - suffix appended to every path
    /// - `RESTNODE_INSECURE` - `1` or `true` disables certificate checks
    /// - `RESTNODE_TIMEOUT_SECS` - request timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns an error if `RESTNODE_TIMEOUT_SECS` is not a number.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(username) = env::var("RESTNODE_USERNAME") {
            let password = env::var("RESTNODE_PASSWORD").unwrap_or_default();
            config.basic_auth = Some(BasicAuth::new(username, password));
        }

        config.path_suffix = env::var("RESTNODE_PATH_SUFFIX")
            .ok()
            .filter(|s| !s.is_empty());

        config.accept_invalid_certs = env::var("RESTNODE_INSECURE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        if let Ok(secs) = env::var("RESTNODE_TIMEOUT_SECS") {
            config.timeout = Some(parse_timeout_secs(&secs)?);
        }

        Ok(config)
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth::new(username, password));
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_path_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = Some(suffix.into());
        self
    }

    /// Disable certificate verification on the default client.
    ///
    /// Only use this against hosts you control.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

fn parse_timeout_secs(secs: &str) -> Result<Duration> {
    secs.trim().parse().map(Duration::from_secs).map_err(|_| {
        RestError::ConfigInvalid(format!(
            "RESTNODE_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_debug_hides_password() {
        let auth = BasicAuth::new("bndr", "hunter2");
        let debug = format!("{:?}", auth);
        assert!(debug.contains("bndr"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_basic_auth_parse() {
        assert_eq!(BasicAuth::parse("user:pass"), BasicAuth::new("user", "pass"));
        assert_eq!(BasicAuth::parse("user:p:ss"), BasicAuth::new("user", "p:ss"));
        assert_eq!(BasicAuth::parse("user"), BasicAuth::new("user", ""));
    }

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30").unwrap(), Duration::from_secs(30));

        let err = parse_timeout_secs("soon").unwrap_err();
        assert!(matches!(err, RestError::ConfigInvalid(_)));
        assert!(err.to_string().starts_with("invalid configuration:"));
        assert!(err.to_string().contains("'soon'"));
    }

    #[test]
    fn test_default_config_verifies_certs() {
        let config = SessionConfig::default();
        assert!(!config.accept_invalid_certs);
        assert!(config.basic_auth.is_none());
        assert!(config.client.is_none());
        assert!(config.path_suffix.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = SessionConfig::new()
            .with_basic_auth("username", "password")
            .with_path_suffix(".json")
            .with_timeout(Duration::from_secs(5))
            .danger_accept_invalid_certs(true);

        let auth = config.basic_auth.unwrap();
        assert_eq!(auth.username, "username");
        assert_eq!(auth.password, "password");
        assert_eq!(config.path_suffix.as_deref(), Some(".json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.accept_invalid_certs);
    }
}
