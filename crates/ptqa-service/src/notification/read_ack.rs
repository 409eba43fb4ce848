//! Persisted set of acknowledged notification ids.

use std::collections::HashSet;

use tracing::warn;

use ptqa_cache::LocalStorage;
use ptqa_cache::keys;
use ptqa_core::result::AppResult;

/// Ids the user has marked read, stored under `read_notification_ids`
/// as a JSON array in acknowledgement order. The set only grows and
/// outlives sessions.
#[derive(Debug, Clone)]
pub struct ReadAckStore {
    storage: LocalStorage,
}

impl ReadAckStore {
    /// Create a store over `storage`.
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// The acknowledged ids. Absent or unreadable data yields an empty set.
    pub async fn load(&self) -> HashSet<String> {
        self.load_ordered().await.into_iter().collect()
    }

    async fn load_ordered(&self) -> Vec<String> {
        match self
            .storage
            .get_json::<Vec<String>>(keys::READ_NOTIFICATION_IDS)
            .await
        {
            Ok(ids) => ids.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Unreadable notification read set; treating as empty");
                Vec::new()
            }
        }
    }

    /// Acknowledge `id`. Returns `false` without writing if it already was.
    pub async fn mark_read(&self, id: &str) -> AppResult<bool> {
        let mut ids = self.load_ordered().await;
        if ids.iter().any(|existing| existing == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.storage
            .set_json(keys::READ_NOTIFICATION_IDS, &ids)
            .await?;
        Ok(true)
    }

    /// Persist the union of the stored set and `current`.
    pub async fn mark_all_read<I, S>(&self, current: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids = self.load_ordered().await;
        let mut seen: HashSet<String> = ids.iter().cloned().collect();
        for id in current {
            let id = id.into();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        self.storage
            .set_json(keys::READ_NOTIFICATION_IDS, &ids)
            .await
    }
}
