//! In-process collection adapter.
//!
//! Evaluates [`CollectionQuery`] with the same semantics the REST gateway
//! applies. Used by the `memory` backend and throughout the tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::query::CollectionQuery;

use super::prepare_insert;

/// Named tables of JSON rows held in memory. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollectionAdapter {
    tables: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    unavailable: Arc<RwLock<HashSet<String>>>,
}

impl MemoryCollectionAdapter {
    /// Create an adapter with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a collection.
    pub async fn seed(&self, collection: &str, rows: Vec<Value>) {
        self.tables
            .write()
            .await
            .insert(collection.to_string(), rows);
    }

    /// Every row of a collection, in insertion order.
    pub async fn rows(&self, collection: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every call on `collection` fail with a remote error, or restore it.
    pub async fn set_unavailable(&self, collection: &str, unavailable: bool) {
        let mut set = self.unavailable.write().await;
        if unavailable {
            set.insert(collection.to_string());
        } else {
            set.remove(collection);
        }
    }

    async fn ensure_available(&self, collection: &str) -> AppResult<()> {
        if self.unavailable.read().await.contains(collection) {
            return Err(AppError::remote(format!(
                "Collection '{collection}' is unavailable"
            )));
        }
        Ok(())
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn row_id(row: &Value) -> Option<String> {
    row.get("id").and_then(id_text)
}

fn merge(target: &mut Value, patch: Map<String, Value>) {
    if let Value::Object(map) = target {
        map.extend(patch);
    }
}

fn into_object(value: Value) -> AppResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::validation("Collection rows must be JSON objects")),
    }
}

#[async_trait]
impl CollectionAdapter for MemoryCollectionAdapter {
    async fn fetch(&self, collection: &str, query: &CollectionQuery) -> AppResult<Vec<Value>> {
        self.ensure_available(collection).await?;
        let tables = self.tables.read().await;
        let matching: Vec<Value> = tables
            .get(collection)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        Ok(query.finish(matching))
    }

    async fn insert(&self, collection: &str, row: Value) -> AppResult<Value> {
        self.ensure_available(collection).await?;
        let mut row = into_object(prepare_insert(row)?)?;
        let id = match row.get("id").and_then(id_text) {
            Some(id) => id,
            None => {
                let id = Uuid::now_v7().simple().to_string();
                row.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut tables = self.tables.write().await;
        let rows = tables.entry(collection.to_string()).or_default();
        if rows.iter().any(|r| row_id(r).as_deref() == Some(id.as_str())) {
            return Err(AppError::conflict(format!(
                "{collection} '{id}' already exists"
            )));
        }
        let row = Value::Object(row);
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<Value> {
        self.ensure_available(collection).await?;
        let patch = into_object(patch)?;
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r).as_deref() == Some(id)))
            .ok_or_else(|| AppError::not_found(format!("{collection} '{id}' not found")))?;
        merge(row, patch);
        Ok(row.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.ensure_available(collection).await?;
        if let Some(rows) = self.tables.write().await.get_mut(collection) {
            rows.retain(|r| row_id(r).as_deref() != Some(id));
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, row: Value) -> AppResult<Value> {
        self.ensure_available(collection).await?;
        let Some(id) = row_id(&row) else {
            return self.insert(collection, row).await;
        };
        let patch = into_object(row)?;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(collection.to_string()).or_default();
        if let Some(existing) = rows.iter_mut().find(|r| row_id(r).as_deref() == Some(id.as_str())) {
            merge(existing, patch);
            return Ok(existing.clone());
        }
        let row = Value::Object(patch);
        rows.push(row.clone());
        Ok(row)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ptqa_core::error::ErrorKind;
    use ptqa_core::types::sorting::SortField;

    use super::*;

    #[tokio::test]
    async fn test_fetch_filters_orders_and_limits() {
        let adapter = MemoryCollectionAdapter::new();
        adapter
            .seed(
                "fund_budgets",
                vec![
                    json!({"id": "b1", "status": "pending", "amount": 100}),
                    json!({"id": "b2", "status": "approved", "amount": 300}),
                    json!({"id": "b3", "status": "rejected", "amount": 200}),
                ],
            )
            .await;

        let query = CollectionQuery::new()
            .is_in("status", ["approved", "rejected"])
            .order_by(SortField::desc("amount"))
            .limit(1);
        let rows = adapter.fetch("fund_budgets", &query).await.unwrap();
        assert_eq!(rows, vec![json!({"id": "b2", "status": "approved", "amount": 300})]);

        let none = adapter.fetch("missing", &CollectionQuery::new()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_insert_generates_id_and_rejects_duplicates() {
        let adapter = MemoryCollectionAdapter::new();
        let row = adapter.insert("students", json!({"name": "Ali"})).await.unwrap();
        assert!(row["id"].as_str().is_some_and(|id| id.len() == 32));
        assert!(row["created_at"].is_string());

        adapter.insert("students", json!({"id": "s1"})).await.unwrap();
        let err = adapter.insert("students", json!({"id": "s1"})).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_merges_and_missing_row_is_not_found() {
        let adapter = MemoryCollectionAdapter::new();
        adapter
            .seed("users", vec![json!({"id": "u1", "name": "Ali", "status": "active"})])
            .await;

        let row = adapter
            .update("users", "u1", json!({"status": "inactive"}))
            .await
            .unwrap();
        assert_eq!(row, json!({"id": "u1", "name": "Ali", "status": "inactive"}));

        let err = adapter.update("users", "u2", json!({})).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_upsert_and_delete() {
        let adapter = MemoryCollectionAdapter::new();
        adapter.upsert("notes", json!({"id": "n1", "text": "a"})).await.unwrap();
        adapter.upsert("notes", json!({"id": "n1", "text": "b"})).await.unwrap();
        assert_eq!(adapter.rows("notes").await, vec![json!({"id": "n1", "text": "b"})]);

        adapter.delete("notes", "n1").await.unwrap();
        adapter.delete("notes", "n1").await.unwrap();
        assert!(adapter.rows("notes").await.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_collection_fails_with_remote_error() {
        let adapter = MemoryCollectionAdapter::new();
        adapter.set_unavailable("transactions", true).await;
        let err = adapter
            .fetch("transactions", &CollectionQuery::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Remote);

        adapter.set_unavailable("transactions", false).await;
        assert!(adapter.fetch("transactions", &CollectionQuery::new()).await.is_ok());
    }
}
