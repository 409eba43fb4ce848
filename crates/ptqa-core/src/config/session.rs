//! Session management configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout in minutes before a session is considered inactive.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u64,
    /// Interval of the inactivity check in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// Route of the login entry point.
    #[serde(default = "default_login_route")]
    pub login_route: String,
    /// Route the guard sends forbidden requests to.
    #[serde(default = "default_home_route")]
    pub home_route: String,
    /// How stored credentials are compared.
    #[serde(default)]
    pub credential_scheme: CredentialScheme,
    /// Minimum length of a new password.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout(),
            check_interval_seconds: default_check_interval(),
            login_route: default_login_route(),
            home_route: default_home_route(),
            credential_scheme: CredentialScheme::default(),
            password_min_length: default_password_min_length(),
        }
    }
}

/// Storage format of the `password` column in the users collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
    /// Clear text, matched by the remote equality filter.
    #[default]
    Plaintext,
    /// Argon2 PHC string, verified locally after lookup by username.
    Argon2,
}

impl fmt::Display for CredentialScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext => write!(f, "plaintext"),
            Self::Argon2 => write!(f, "argon2"),
        }
    }
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_check_interval() -> u64 {
    60
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_home_route() -> String {
    "/".to_string()
}

fn default_password_min_length() -> usize {
    4
}
