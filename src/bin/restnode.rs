//! restnode CLI binary.
//!
//! Sends a single request through a [`restnode::Resource`] and prints the
//! response.

use clap::Parser;
use restnode::cli::Cli;
use restnode::output::{body_text, PrettyPrint};
use restnode::{Session, SessionConfig};
use std::process::ExitCode;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(response) = e.response() {
                eprintln!("{}", body_text(response));
            }
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the server answered with a success status.
async fn run(cli: Cli) -> restnode::Result<bool> {
    let config = cli.session_config(SessionConfig::from_env()?);
    let session = Session::new(&cli.base_url, config)?;

    let mut resource = cli
        .segments
        .iter()
        .fold(session.root(), |node, segment| node.child(segment))
        .query(cli.query);
    for (name, value) in cli.headers {
        resource = resource.header(name, value);
    }
    if let Some(data) = &cli.data {
        resource = resource.payload(data)?;
    }

    let response = resource.execute(cli.verb.method()).await?;

    if cli.json {
        println!("{}", body_text(&response));
    } else {
        println!("{}", response.pretty_print());
    }

    Ok(response.is_success())
}
