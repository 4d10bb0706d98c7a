//! Test data fixtures for the mock server.

use super::state::MockUser;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Create a user with required fields only.
    pub fn user(login: &str, id: u64, name: &str) -> MockUser {
        MockUser {
            login: login.to_string(),
            id,
            name: name.to_string(),
            company: None,
            public_repos: 0,
        }
    }

    /// The users every default server starts with.
    pub fn default_users() -> Vec<MockUser> {
        let mut bndr = Self::user("bndr", 1145456, "Vadim Kravcenko");
        bndr.public_repos = 17;

        let mut torvalds = Self::user("torvalds", 1024025, "Linus Torvalds");
        torvalds.company = Some("Linux Foundation".to_string());
        torvalds.public_repos = 2;

        vec![bndr, torvalds]
    }
}
