//! Audit log repository implementation.

use std::sync::Arc;

use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::audit::model::{AuditLogEntry, CreateAuditLogEntry};

use super::{decode_rows, encode_row};

const COLLECTION: &str = "audit_logs";

/// Repository for `audit_logs`. Entries are append-only.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// Append an audit record.
    pub async fn create(&self, entry: &CreateAuditLogEntry) -> AppResult<()> {
        self.adapter.insert(COLLECTION, encode_row(entry)?).await?;
        Ok(())
    }

    /// Most recent entries first.
    pub async fn find_recent(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>> {
        let query = CollectionQuery::new()
            .order_by(SortField::desc("timestamp"))
            .limit(limit);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Entries with the given action code, most recent first.
    pub async fn find_by_action(&self, action: &str) -> AppResult<Vec<AuditLogEntry>> {
        let query = CollectionQuery::new()
            .eq("action", action)
            .order_by(SortField::desc("timestamp"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }
}
