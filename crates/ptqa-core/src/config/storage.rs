//! Persistent key-value storage configuration.

use serde::{Deserialize, Serialize};

/// Backing store for the durable key-value storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// A single JSON document on disk.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

/// Durable local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage implementation.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Path of the JSON document for the `file` provider.
    #[serde(default = "default_path")]
    pub path: String,
    /// Optional prefix prepended to every key.
    #[serde(default)]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            path: default_path(),
            key_prefix: String::new(),
        }
    }
}

fn default_path() -> String {
    "data/local_storage.json".to_string()
}
