//! Fund disbursement repository implementation.

use std::sync::Arc;

use serde_json::json;

use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::id::{BudgetId, DisbursementId};
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::budget::{CreateDisbursement, Disbursement};

use super::{decode_row, decode_rows};

const COLLECTION: &str = "fund_disbursements";

/// Repository for `fund_disbursements`. Entries are append-only.
#[derive(Debug, Clone)]
pub struct DisbursementRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl DisbursementRepository {
    /// Create a new disbursement repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// All disbursements, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Disbursement>> {
        let query = CollectionQuery::new().order_by(SortField::desc("date"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Disbursements drawn from one budget.
    pub async fn find_by_budget(&self, budget_id: &BudgetId) -> AppResult<Vec<Disbursement>> {
        let query = CollectionQuery::new().eq("budget_id", budget_id.as_str());
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Record a disbursement, denormalising the budget name.
    pub async fn create(&self, data: &CreateDisbursement, budget_name: &str) -> AppResult<Disbursement> {
        let row = json!({
            "id": DisbursementId::generate(),
            "budget_id": data.budget_id,
            "budget_name": budget_name,
            "amount": data.amount,
            "description": data.description,
            "date": data.date,
        });
        let row = self.adapter.insert(COLLECTION, row).await?;
        decode_row(COLLECTION, row)
    }
}
