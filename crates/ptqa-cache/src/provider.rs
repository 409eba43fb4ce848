//! Storage manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use ptqa_core::config::storage::{StorageConfig, StorageProvider};
use ptqa_core::result::AppResult;
use ptqa_core::traits::storage::KeyValueStore;

use crate::file::FileKeyValueStore;
use crate::memory::MemoryKeyValueStore;

/// Durable local storage wrapping the configured backend.
///
/// Applies the optional key prefix and offers typed JSON helpers.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// The inner backend.
    inner: Arc<dyn KeyValueStore>,
    /// Prefix prepended to every key.
    prefix: String,
}

impl LocalStorage {
    /// Create local storage from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider {
            StorageProvider::File => {
                info!(path = %config.path, "Initializing file-backed local storage");
                Arc::new(FileKeyValueStore::open(&config.path).await?)
            }
            StorageProvider::Memory => {
                info!("Initializing in-memory local storage");
                Arc::new(MemoryKeyValueStore::new())
            }
        };

        Ok(Self {
            inner,
            prefix: config.key_prefix.clone(),
        })
    }

    /// Create local storage from an existing backend (for testing).
    pub fn from_provider(provider: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: provider,
            prefix: String::new(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Read and deserialize a JSON value. Returns `None` if the key is absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write a JSON value.
    pub async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(&self.key(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(&self.key(key), value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(&self.key(key)).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
