//! Basic example walking a public REST API.
//!
//! Run with:
//! ```
//! cargo run --example basic
//! ```
//!
//! Set `RESTNODE_BASE_URL` to point it at another GitHub-compatible API.

use std::collections::HashMap;

use restnode::{Session, SessionConfig, Target};
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
struct User {
    login: String,
    name: Option<String>,
    public_repos: u32,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Repo {
    name: String,
    stargazers_count: u32,
}

#[tokio::main]
async fn main() -> restnode::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let session = match Session::from_env() {
        Ok(session) => session,
        Err(_) => Session::new("https://api.github.com", SessionConfig::from_env()?)?,
    };
    println!("Connected to: {}", session.base_url());

    let api = session.root();
    let users = api.child("users");

    println!("\n--- Users ---");
    for login in ["bndr", "torvalds"] {
        let user = Target::<User>::new();
        let response = users.id(login).decode_into(&user).get().await?;
        if !response.is_success() {
            println!("  {login}: HTTP {}", response.status());
            continue;
        }
        let user = user.take();
        println!(
            "  {} ({}) - {} public repos",
            user.login,
            user.name.as_deref().unwrap_or("no name"),
            user.public_repos
        );
    }

    println!("\n--- Repositories for bndr (first page) ---");
    let repos = Target::<Vec<Repo>>::new();
    users
        .id("bndr")
        .child("repos")
        .decode_into(&repos)
        .get_with(&HashMap::from([("per_page", "5"), ("sort", "updated")]))
        .await?
        .error_for_status()?;

    for repo in repos.get() {
        println!("  - {} ({} stars)", repo.name, repo.stargazers_count);
    }

    println!("\nDone!");
    Ok(())
}
