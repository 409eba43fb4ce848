//! Persisted session keys.

use tracing::warn;

use ptqa_cache::LocalStorage;
use ptqa_cache::keys;
use ptqa_core::error::ErrorKind;
use ptqa_core::result::AppResult;
use ptqa_core::traits::storage::KeyValueStore;
use ptqa_entity::user::Principal;

/// Reads and writes the `auth_user` and `last_activity` keys.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: LocalStorage,
}

impl SessionStore {
    /// Create a store over `storage`.
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// The persisted principal. An unreadable value counts as absent.
    pub async fn load_principal(&self) -> AppResult<Option<Principal>> {
        match self.storage.get_json::<Principal>(keys::AUTH_USER).await {
            Ok(principal) => Ok(principal),
            Err(e) if e.kind == ErrorKind::Serialization => {
                warn!(error = %e, "Discarding unreadable persisted principal");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The persisted last-activity time in epoch milliseconds.
    pub async fn load_last_activity(&self) -> AppResult<Option<i64>> {
        let Some(raw) = self.storage.get(keys::LAST_ACTIVITY).await? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(millis) => Ok(Some(millis)),
            Err(e) => {
                warn!(value = %raw, error = %e, "Discarding unreadable last activity");
                Ok(None)
            }
        }
    }

    /// Persist the principal.
    pub async fn save_principal(&self, principal: &Principal) -> AppResult<()> {
        self.storage.set_json(keys::AUTH_USER, principal).await
    }

    /// Persist the last-activity time.
    pub async fn save_last_activity(&self, millis: i64) -> AppResult<()> {
        self.storage
            .set(keys::LAST_ACTIVITY, &millis.to_string())
            .await
    }

    /// Remove every session key. Attempts all keys and reports the first failure.
    pub async fn clear(&self) -> AppResult<()> {
        let mut first_error = None;
        for key in keys::SESSION_KEYS {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key, error = %e, "Failed to remove session key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
