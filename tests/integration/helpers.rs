//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use ptqa_cache::LocalStorage;
use ptqa_cache::memory::MemoryKeyValueStore;
use ptqa_core::config::AppConfig;
use ptqa_core::traits::clock::{Clock, ManualClock};
use ptqa_core::traits::navigation::RecordingNavigator;
use ptqa_database::Backend;
use ptqa_database::adapters::MemoryCollectionAdapter;
use ptqa_service::{Application, RequestContext};

/// Test application context over in-memory collections and storage
pub struct TestApp {
    /// The wired application
    pub app: Application,
    /// Backing collections, for seeding and inspection
    pub adapter: MemoryCollectionAdapter,
    /// Backing key-value store
    pub kv: MemoryKeyValueStore,
    /// Captured navigation requests
    pub navigator: RecordingNavigator,
    /// Controlled time source
    pub clock: ManualClock,
    cache_fallback: bool,
}

impl TestApp {
    /// Create a new test application with the standard users seeded
    pub async fn new() -> Self {
        let adapter = MemoryCollectionAdapter::new();
        adapter.seed("users", default_users()).await;
        Self::with_state(
            adapter,
            MemoryKeyValueStore::new(),
            ManualClock::new(Utc::now()),
            false,
        )
    }

    /// Like [`TestApp::new`], with failed reads served from snapshots kept
    /// in `kv`
    pub async fn with_cache_fallback() -> Self {
        let adapter = MemoryCollectionAdapter::new();
        adapter.seed("users", default_users()).await;
        Self::with_state(
            adapter,
            MemoryKeyValueStore::new(),
            ManualClock::new(Utc::now()),
            true,
        )
    }

    /// A second application over the same collections, storage and clock,
    /// as after a reload
    pub fn reload(&self) -> Self {
        Self::with_state(
            self.adapter.clone(),
            self.kv.clone(),
            self.clock.clone(),
            self.cache_fallback,
        )
    }

    fn with_state(
        adapter: MemoryCollectionAdapter,
        kv: MemoryKeyValueStore,
        clock: ManualClock,
        cache_fallback: bool,
    ) -> Self {
        let navigator = RecordingNavigator::new();
        let backend = if cache_fallback {
            Backend::with_cache_fallback(Arc::new(adapter.clone()), Arc::new(kv.clone()))
        } else {
            Backend::from_adapter(Arc::new(adapter.clone()))
        };
        let app = Application::from_parts(
            AppConfig::default(),
            LocalStorage::from_provider(Arc::new(kv.clone())),
            backend,
            Arc::new(navigator.clone()),
            Arc::new(clock.clone()),
        );
        Self {
            app,
            adapter,
            kv,
            navigator,
            clock,
            cache_fallback,
        }
    }

    /// Current time of the controlled clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Replace the rows of a collection
    pub async fn seed(&self, collection: &str, rows: Vec<Value>) {
        self.adapter.seed(collection, rows).await;
    }

    /// Log in with one of the seeded users and return a request context
    pub async fn login_as(&self, username: &str) -> RequestContext {
        self.app
            .session
            .login(username, &format!("{username}123"))
            .await
            .expect("seeded user should log in");
        self.app.context().expect("context after login")
    }

    /// Audit rows as (action, details, user_name)
    pub async fn audit_rows(&self) -> Vec<(String, String, String)> {
        self.adapter
            .rows("audit_logs")
            .await
            .iter()
            .map(|r| {
                (
                    text(&r["action"]),
                    text(&r["details"]),
                    text(&r["user_name"]),
                )
            })
            .collect()
    }

    /// Audit action codes in insertion order
    pub async fn audit_actions(&self) -> Vec<String> {
        self.audit_rows().await.into_iter().map(|(a, _, _)| a).collect()
    }
}

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// Admin, bendahara, pengasuh (legacy `user` role) and an inactive account
pub fn default_users() -> Vec<Value> {
    vec![
        json!({"id": "u-admin", "username": "admin", "password": "admin123", "name": "Administrator", "role": "admin", "status": "active"}),
        json!({"id": "u-bendahara", "username": "bendahara", "password": "bendahara123", "name": "Ibu Siti", "role": "bendahara", "status": "active"}),
        json!({"id": "u-pengasuh", "username": "pengasuh", "password": "pengasuh123", "name": "Ustadz Ahmad", "role": "user", "status": "active"}),
        json!({"id": "u-lama", "username": "lama", "password": "lama123", "name": "Lama", "role": "bendahara", "status": "inactive"}),
    ]
}
