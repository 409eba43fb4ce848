//! Fund budget repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::id::BudgetId;
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::budget::{Budget, BudgetStatus, CreateBudget};

use super::{decode_row, decode_rows};

const COLLECTION: &str = "fund_budgets";

/// Repository for `fund_budgets`.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl BudgetRepository {
    /// Create a new budget repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// All budgets, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Budget>> {
        let query = CollectionQuery::new().order_by(SortField::desc("created_at"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Find a budget by primary key.
    pub async fn find_by_id(&self, id: &BudgetId) -> AppResult<Option<Budget>> {
        let query = CollectionQuery::new().eq("id", id.as_str()).limit(1);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows).into_iter().next())
    }

    /// Budgets in the given status, newest first.
    pub async fn find_by_status(&self, status: BudgetStatus) -> AppResult<Vec<Budget>> {
        let query = CollectionQuery::new()
            .eq("status", status.as_str())
            .order_by(SortField::desc("created_at"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Approved or rejected budgets decided at or after `since`,
    /// most recent decision first, capped at `limit`.
    pub async fn find_decided_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<Budget>> {
        let query = CollectionQuery::new()
            .is_in(
                "status",
                [BudgetStatus::Approved.as_str(), BudgetStatus::Rejected.as_str()],
            )
            .gte("approved_at", since.to_rfc3339())
            .snapshot_as("recent_decisions")
            .order_by(SortField::desc("approved_at"))
            .limit(limit);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Insert a pending budget.
    pub async fn create(&self, data: &CreateBudget) -> AppResult<Budget> {
        let row = json!({
            "id": BudgetId::generate(),
            "name": data.name,
            "amount": data.amount,
            "description": data.description,
            "period": data.period,
            "status": BudgetStatus::Pending,
        });
        let row = self.adapter.insert(COLLECTION, row).await?;
        decode_row(COLLECTION, row)
    }

    /// Record a decision on a budget.
    pub async fn record_decision(
        &self,
        id: &BudgetId,
        status: BudgetStatus,
        approved_by: &str,
        approved_at: DateTime<Utc>,
    ) -> AppResult<Budget> {
        let patch = json!({
            "status": status,
            "approved_by": approved_by,
            "approved_at": approved_at.to_rfc3339(),
        });
        let row = self.adapter.update(COLLECTION, id.as_str(), patch).await?;
        decode_row(COLLECTION, row)
    }
}
