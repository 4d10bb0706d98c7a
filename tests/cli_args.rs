//! CLI argument parsing tests.

use clap::Parser;
use restnode::cli::{Cli, Verb};
use restnode::{BasicAuth, Method, SessionConfig};

#[test]
fn test_cli_parses_get_with_segments() {
    let cli = Cli::parse_from(["restnode", "get", "https://api.github.com", "users", "bndr"]);

    assert!(!cli.json);
    assert!(!cli.verbose);
    assert_eq!(cli.verb, Verb::Get);
    assert_eq!(cli.base_url, "https://api.github.com");
    assert_eq!(cli.segments, vec!["users", "bndr"]);
    assert!(cli.data.is_none());
}

#[test]
fn test_cli_parses_query_and_headers() {
    let cli = Cli::parse_from([
        "restnode",
        "get",
        "https://x.test",
        "items",
        "-q",
        "page=100",
        "--query",
        "q=a=b",
        "-H",
        "Accept: application/json",
    ]);

    assert_eq!(
        cli.query,
        vec![
            ("page".to_string(), "100".to_string()),
            ("q".to_string(), "a=b".to_string()),
        ]
    );
    assert_eq!(
        cli.headers,
        vec![("Accept".to_string(), "application/json".to_string())]
    );
}

#[test]
fn test_cli_parses_post_with_data() {
    let cli = Cli::parse_from([
        "restnode",
        "post",
        "https://x.test",
        "items",
        "123",
        "--data",
        r#"{"Key": "Value1"}"#,
        "--user",
        "username:password",
        "--suffix",
        ".json",
        "--insecure",
        "--json",
    ]);

    assert_eq!(cli.verb, Verb::Post);
    assert_eq!(cli.data.unwrap()["Key"], "Value1");
    assert_eq!(cli.user.as_deref(), Some("username:password"));
    assert_eq!(cli.suffix.as_deref(), Some(".json"));
    assert!(cli.insecure);
    assert!(cli.json);
}

#[test]
fn test_cli_rejects_invalid_json() {
    let result = Cli::try_parse_from(["restnode", "put", "https://x.test", "--data", "{oops"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_malformed_pairs() {
    let result = Cli::try_parse_from(["restnode", "get", "https://x.test", "-q", "novalue"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["restnode", "get", "https://x.test", "-H", ":empty"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_verb() {
    let result = Cli::try_parse_from(["restnode", "fetch", "https://x.test"]);
    assert!(result.is_err());
}

#[test]
fn test_verb_maps_to_method() {
    assert_eq!(Verb::Get.method(), Method::GET);
    assert_eq!(Verb::Head.method(), Method::HEAD);
    assert_eq!(Verb::Delete.method(), Method::DELETE);
    assert_eq!(Verb::Options.method(), Method::OPTIONS);
    assert_eq!(Verb::Put.method(), Method::PUT);
    assert_eq!(Verb::Post.method(), Method::POST);
    assert_eq!(Verb::Patch.method(), Method::PATCH);
}

#[test]
fn test_session_config_falls_back_to_environment_config() {
    let cli = Cli::parse_from(["restnode", "get", "https://x.test", "users"]);
    let from_env = SessionConfig::new()
        .with_basic_auth("env-user", "env-pass")
        .with_path_suffix(".xml");

    let config = cli.session_config(from_env);

    assert_eq!(config.basic_auth, Some(BasicAuth::new("env-user", "env-pass")));
    assert_eq!(config.path_suffix.as_deref(), Some(".xml"));
    assert!(!config.accept_invalid_certs);
}

#[test]
fn test_session_config_flags_override_environment_config() {
    let cli = Cli::parse_from([
        "restnode",
        "get",
        "https://x.test",
        "-u",
        "username:password",
        "--suffix",
        ".json",
        "--insecure",
    ]);
    let from_env = SessionConfig::new()
        .with_basic_auth("env-user", "env-pass")
        .with_path_suffix(".xml");

    let config = cli.session_config(from_env);

    assert_eq!(config.basic_auth, Some(BasicAuth::new("username", "password")));
    assert_eq!(config.path_suffix.as_deref(), Some(".json"));
    assert!(config.accept_invalid_certs);
}
