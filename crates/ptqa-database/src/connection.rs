//! Backend construction from configuration.

use std::sync::Arc;

use tracing::info;

use ptqa_core::config::backend::{BackendConfig, BackendProvider};
use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::traits::storage::KeyValueStore;

use crate::adapters::{CachedCollectionAdapter, MemoryCollectionAdapter, RestCollectionAdapter};

/// Handle on the configured collection adapter, shared by every repository.
///
/// Reads through [`Backend::adapter`] may be answered from stored snapshots
/// when the remote is down. [`Backend::direct`] never is, and is what
/// credential checks and account administration use.
#[derive(Debug, Clone)]
pub struct Backend {
    adapter: Arc<dyn CollectionAdapter>,
    direct: Arc<dyn CollectionAdapter>,
}

impl Backend {
    /// Build the adapter described by `config`.
    ///
    /// When `cache_fallback` is enabled the adapter is wrapped so that
    /// failed reads fall back to snapshots kept in `storage`.
    pub fn connect(config: &BackendConfig, storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let adapter: Arc<dyn CollectionAdapter> = match config.provider {
            BackendProvider::Rest => {
                info!(
                    url = %config.url,
                    api_key = %mask_key(&config.api_key),
                    schema = %config.schema,
                    timeout_seconds = config.request_timeout_seconds,
                    "Connecting to hosted backend"
                );
                Arc::new(RestCollectionAdapter::new(config)?)
            }
            BackendProvider::Memory => {
                info!("Using in-memory collections");
                Arc::new(MemoryCollectionAdapter::new())
            }
        };

        if config.cache_fallback {
            Ok(Self::with_cache_fallback(adapter, storage))
        } else {
            Ok(Self::from_adapter(adapter))
        }
    }

    /// Wrap an existing adapter (for testing).
    pub fn from_adapter(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self {
            direct: Arc::clone(&adapter),
            adapter,
        }
    }

    /// Serve failed reads from snapshots in `storage`, keeping `inner`
    /// reachable uncached through [`Backend::direct`].
    pub fn with_cache_fallback(
        inner: Arc<dyn CollectionAdapter>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            adapter: Arc::new(CachedCollectionAdapter::new(Arc::clone(&inner), storage)),
            direct: inner,
        }
    }

    /// The shared adapter.
    pub fn adapter(&self) -> Arc<dyn CollectionAdapter> {
        Arc::clone(&self.adapter)
    }

    /// The adapter without snapshot fallback.
    pub fn direct(&self) -> Arc<dyn CollectionAdapter> {
        Arc::clone(&self.direct)
    }
}

/// Mask all but the first few characters of an API key for safe logging.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    if key.chars().count() <= 6 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
