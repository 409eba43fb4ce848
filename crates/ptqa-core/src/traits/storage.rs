//! Persistent key-value storage trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Durable string storage that survives restarts, in the manner of a
/// browser's local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read a value. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Short name of the implementation, for logs.
    fn provider_name(&self) -> &'static str;
}
