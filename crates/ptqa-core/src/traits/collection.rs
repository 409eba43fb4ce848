//! Remote collection adapter trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::query::CollectionQuery;

/// Generic access to the named collections of the hosted backend.
///
/// Rows travel as JSON objects; typed repositories convert them into
/// entity structs at the boundary. Every method is a suspension point.
#[async_trait]
pub trait CollectionAdapter: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch rows matching the query.
    async fn fetch(&self, collection: &str, query: &CollectionQuery) -> AppResult<Vec<Value>>;

    /// Insert a row and return it as stored.
    async fn insert(&self, collection: &str, row: Value) -> AppResult<Value>;

    /// Merge `patch` into the row with the given id and return the result.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<Value>;

    /// Delete the row with the given id.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Insert the row, or merge it into an existing row with the same id.
    async fn upsert(&self, collection: &str, row: Value) -> AppResult<Value>;

    /// Short name of the implementation, for logs.
    fn provider_name(&self) -> &'static str;
}
