//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the restnode binary.

use clap::{Parser, ValueEnum};
use reqwest::Method;

use crate::config::{BasicAuth, SessionConfig};

/// Send one request to a REST API and print the response.
#[derive(Parser, Debug)]
#[command(name = "restnode", about = "REST resource CLI", version)]
pub struct Cli {
    /// Print only the response body instead of a status/headers view.
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Log request details to stderr.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// HTTP verb to use.
    pub verb: Verb,

    /// API root, e.g. `https://api.github.com`.
    #[arg(env = "RESTNODE_BASE_URL")]
    pub base_url: String,

    /// Path segments appended to the base URL, in order.
    pub segments: Vec<String>,

    /// Query parameter as `key=value` (repeatable).
    #[arg(short, long = "query", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,

    /// Request header as `name:value` (repeatable).
    #[arg(short = 'H', long = "header", value_parser = parse_header_pair)]
    pub headers: Vec<(String, String)>,

    /// JSON payload sent as the request body.
    #[arg(short, long, value_parser = parse_json)]
    pub data: Option<serde_json::Value>,

    /// Basic auth credentials as `user:password`.
    ///
    /// Defaults to `RESTNODE_USERNAME` / `RESTNODE_PASSWORD`.
    #[arg(short, long)]
    pub user: Option<String>,

    /// Suffix appended to the request path, e.g. `.json`.
    #[arg(long, env = "RESTNODE_PATH_SUFFIX")]
    pub suffix: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(long, default_value = "false")]
    pub insecure: bool,
}

impl Cli {
    /// Layer the command-line options over `base`, usually
    /// [`SessionConfig::from_env`]. Flags win over the environment.
    pub fn session_config(&self, mut base: SessionConfig) -> SessionConfig {
        if self.insecure {
            base.accept_invalid_certs = true;
        }
        if let Some(user) = self.user.as_deref() {
            base.basic_auth = Some(BasicAuth::parse(user));
        }
        if let Some(suffix) = &self.suffix {
            base.path_suffix = Some(suffix.clone());
        }
        base
    }
}

/// HTTP verbs the CLI can send.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    Get,
    Head,
    Delete,
    Options,
    Put,
    Post,
    Patch,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Head => Method::HEAD,
            Verb::Delete => Method::DELETE,
            Verb::Options => Method::OPTIONS,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
            Verb::Patch => Method::PATCH,
        }
    }
}

fn parse_query_pair(s: &str) -> Result<(String, String), String> {
    split_pair(s, '=').ok_or_else(|| format!("expected key=value, got '{s}'"))
}

fn parse_header_pair(s: &str) -> Result<(String, String), String> {
    split_pair(s, ':').ok_or_else(|| format!("expected name:value, got '{s}'"))
}

fn parse_json(s: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))
}

fn split_pair(s: &str, separator: char) -> Option<(String, String)> {
    let (key, value) = s.split_once(separator)?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}
