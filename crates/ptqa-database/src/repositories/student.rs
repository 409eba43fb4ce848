//! Student repository implementation.

use std::sync::Arc;

use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::id::StudentId;
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::student::Student;

use super::decode_rows;

const COLLECTION: &str = "students";

/// Repository for `students`.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl StudentRepository {
    /// Create a new student repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// All students ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<Student>> {
        let query = CollectionQuery::new().order_by(SortField::asc("name"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Find a student by primary key.
    pub async fn find_by_id(&self, id: &StudentId) -> AppResult<Option<Student>> {
        let query = CollectionQuery::new().eq("id", id.as_str()).limit(1);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows).into_iter().next())
    }
}
