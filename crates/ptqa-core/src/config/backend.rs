//! Remote collection backend configuration.

use serde::{Deserialize, Serialize};

/// Which collection adapter to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Hosted PostgREST-style HTTP API.
    #[default]
    Rest,
    /// In-process tables, used for tests and demos.
    Memory,
}

/// Hosted database-as-a-service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Adapter implementation.
    #[serde(default)]
    pub provider: BackendProvider,
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Anonymous API key sent as `apikey` and bearer token.
    #[serde(default)]
    pub api_key: String,
    /// Database schema exposed by the REST gateway.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Whether fetches fall back to the last-known-good local copy.
    #[serde(default = "default_true")]
    pub cache_fallback: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            url: String::new(),
            api_key: String::new(),
            schema: default_schema(),
            request_timeout_seconds: default_request_timeout(),
            cache_fallback: true,
        }
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_true() -> bool {
    true
}
