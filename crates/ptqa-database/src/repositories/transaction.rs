//! Transaction repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::id::TransactionId;
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::finance::{CreateTransaction, Transaction, TransactionType};

use super::{decode_row, decode_rows, encode_row};

const COLLECTION: &str = "transactions";

/// Repository for the cash book.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl TransactionRepository {
    /// Create a new transaction repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// All transactions, newest booking date first.
    pub async fn find_all(&self) -> AppResult<Vec<Transaction>> {
        let query = CollectionQuery::new().order_by(SortField::desc("date"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Find a transaction by primary key.
    pub async fn find_by_id(&self, id: &TransactionId) -> AppResult<Option<Transaction>> {
        let query = CollectionQuery::new().eq("id", id.as_str()).limit(1);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows).into_iter().next())
    }

    /// Expenses of at least `threshold` created at or after `since`,
    /// newest first, capped at `limit`.
    pub async fn find_large_expenses(
        &self,
        threshold: i64,
        since: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<Transaction>> {
        let query = CollectionQuery::new()
            .eq("type", TransactionType::Pengeluaran.as_str())
            .gte("amount", threshold)
            .gte("created_at", since.to_rfc3339())
            .snapshot_as("large_expenses")
            .order_by(SortField::desc("created_at"))
            .limit(limit);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Record a transaction.
    pub async fn create(&self, data: &CreateTransaction) -> AppResult<Transaction> {
        let mut row = encode_row(data)?;
        if let Value::Object(map) = &mut row {
            map.insert(
                "id".to_string(),
                Value::String(TransactionId::generate().into_inner()),
            );
        }
        let row = self.adapter.insert(COLLECTION, row).await?;
        decode_row(COLLECTION, row)
    }

    /// Replace the editable fields of a transaction.
    pub async fn update(&self, id: &TransactionId, data: &CreateTransaction) -> AppResult<Transaction> {
        let row = self
            .adapter
            .update(COLLECTION, id.as_str(), encode_row(data)?)
            .await?;
        decode_row(COLLECTION, row)
    }

    /// Delete a transaction.
    pub async fn delete(&self, id: &TransactionId) -> AppResult<()> {
        self.adapter.delete(COLLECTION, id.as_str()).await
    }
}
