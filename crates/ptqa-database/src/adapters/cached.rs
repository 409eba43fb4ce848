//! Last-known-good fallback for collection reads.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use ptqa_cache::keys;
use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::traits::storage::KeyValueStore;
use ptqa_core::types::query::CollectionQuery;

/// Wraps an adapter so that a failed fetch is answered from the rows the
/// same query returned last time it succeeded. Writes pass through.
///
/// Snapshots are keyed by [`CollectionQuery::cache_key`], so queries whose
/// filters follow the clock should be named with
/// [`CollectionQuery::snapshot_as`].
#[derive(Debug, Clone)]
pub struct CachedCollectionAdapter {
    inner: Arc<dyn CollectionAdapter>,
    storage: Arc<dyn KeyValueStore>,
}

impl CachedCollectionAdapter {
    /// Wrap `inner`, keeping snapshots in `storage`.
    pub fn new(inner: Arc<dyn CollectionAdapter>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, storage }
    }

    fn snapshot_key(collection: &str, query: &CollectionQuery) -> String {
        keys::collection_snapshot(&query.cache_key(collection))
    }

    async fn load_snapshot(&self, key: &str) -> Option<Vec<Value>> {
        match self.storage.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    warn!(key, error = %e, "Discarding unreadable collection snapshot");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read collection snapshot");
                None
            }
        }
    }
}

#[async_trait]
impl CollectionAdapter for CachedCollectionAdapter {
    async fn fetch(&self, collection: &str, query: &CollectionQuery) -> AppResult<Vec<Value>> {
        let key = Self::snapshot_key(collection, query);

        match self.inner.fetch(collection, query).await {
            Ok(rows) => {
                match serde_json::to_string(&rows) {
                    Ok(raw) => {
                        if let Err(e) = self.storage.set(&key, &raw).await {
                            warn!(key = %key, error = %e, "Failed to store collection snapshot");
                        }
                    }
                    Err(e) => warn!(key = %key, error = %e, "Failed to encode collection snapshot"),
                }
                Ok(rows)
            }
            Err(err) => match self.load_snapshot(&key).await {
                Some(rows) => {
                    warn!(
                        collection,
                        error = %err,
                        rows = rows.len(),
                        "Fetch failed, serving last-known-good rows"
                    );
                    Ok(rows)
                }
                None => {
                    debug!(collection, "Fetch failed and no snapshot is available");
                    Err(err)
                }
            },
        }
    }

    async fn insert(&self, collection: &str, row: Value) -> AppResult<Value> {
        self.inner.insert(collection, row).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<Value> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.inner.delete(collection, id).await
    }

    async fn upsert(&self, collection: &str, row: Value) -> AppResult<Value> {
        self.inner.upsert(collection, row).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ptqa_cache::memory::MemoryKeyValueStore;
    use ptqa_core::error::ErrorKind;

    use super::*;
    use crate::adapters::MemoryCollectionAdapter;

    #[tokio::test]
    async fn test_failed_fetch_serves_snapshot() {
        let remote = MemoryCollectionAdapter::new();
        remote
            .seed("students", vec![json!({"id": "s1", "name": "Ali"})])
            .await;
        let cached = CachedCollectionAdapter::new(
            Arc::new(remote.clone()),
            Arc::new(MemoryKeyValueStore::new()),
        );
        let query = CollectionQuery::new();

        let fresh = cached.fetch("students", &query).await.unwrap();
        assert_eq!(fresh.len(), 1);

        remote.set_unavailable("students", true).await;
        let fallback = cached.fetch("students", &query).await.unwrap();
        assert_eq!(fallback, fresh);
    }

    #[tokio::test]
    async fn test_failed_fetch_without_snapshot_propagates() {
        let remote = MemoryCollectionAdapter::new();
        remote.set_unavailable("students", true).await;
        let cached = CachedCollectionAdapter::new(
            Arc::new(remote),
            Arc::new(MemoryKeyValueStore::new()),
        );

        let err = cached
            .fetch("students", &CollectionQuery::new().eq("kelas", "7"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Remote);
    }

    #[tokio::test]
    async fn test_named_query_replaces_its_snapshot() {
        let remote = MemoryCollectionAdapter::new();
        remote
            .seed(
                "transactions",
                vec![json!({"id": "t1", "created_at": "2024-03-09T08:00:00+00:00"})],
            )
            .await;
        let kv = MemoryKeyValueStore::new();
        let cached = CachedCollectionAdapter::new(Arc::new(remote.clone()), Arc::new(kv.clone()));
        let since = |ts: &str| {
            CollectionQuery::new()
                .gte("created_at", ts)
                .snapshot_as("large_expenses")
        };

        cached.fetch("transactions", &since("2024-03-02T08:00:00+00:00")).await.unwrap();
        cached.fetch("transactions", &since("2024-03-02T08:00:30+00:00")).await.unwrap();
        assert_eq!(kv.len(), 1);

        remote.set_unavailable("transactions", true).await;
        let rows = cached
            .fetch("transactions", &since("2024-03-02T08:01:00+00:00"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_are_not_masked() {
        let remote = MemoryCollectionAdapter::new();
        remote.set_unavailable("users", true).await;
        let cached = CachedCollectionAdapter::new(
            Arc::new(remote),
            Arc::new(MemoryKeyValueStore::new()),
        );

        assert!(cached.insert("users", json!({"id": "u1"})).await.is_err());
    }
}
