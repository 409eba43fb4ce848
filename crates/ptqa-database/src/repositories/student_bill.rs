//! Student bill repository implementation.

use std::sync::Arc;

use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::id::{BillId, StudentId};
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::student::{BillStatus, StudentBill};

use super::decode_rows;

const COLLECTION: &str = "student_bills";

/// Repository for `student_bills`.
#[derive(Debug, Clone)]
pub struct StudentBillRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl StudentBillRepository {
    /// Create a new bill repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// Unpaid bills whose `YYYY-MM` period sorts strictly before `period`.
    pub async fn find_unpaid_before(&self, period: &str) -> AppResult<Vec<StudentBill>> {
        let query = CollectionQuery::new()
            .eq("status", BillStatus::BelumLunas.as_str())
            .lt("month", period)
            .snapshot_as("overdue");
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Bills of one student, newest period first.
    pub async fn find_by_student(&self, student_id: &StudentId) -> AppResult<Vec<StudentBill>> {
        let query = CollectionQuery::new()
            .eq("student_id", student_id.as_str())
            .order_by(SortField::desc("month"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Find a bill by primary key.
    pub async fn find_by_id(&self, id: &BillId) -> AppResult<Option<StudentBill>> {
        let query = CollectionQuery::new().eq("id", id.as_str()).limit(1);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows).into_iter().next())
    }
}
