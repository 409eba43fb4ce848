//! Collection adapter implementations.

pub mod cached;
pub mod memory;
pub mod rest;

pub use cached::CachedCollectionAdapter;
pub use memory::MemoryCollectionAdapter;
pub use rest::RestCollectionAdapter;

use chrono::Utc;
use serde_json::Value;

use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;

/// Ensure `row` is a JSON object and stamp `created_at` when absent.
pub(crate) fn prepare_insert(row: Value) -> AppResult<Value> {
    let Value::Object(mut map) = row else {
        return Err(AppError::validation("Collection rows must be JSON objects"));
    };
    map.entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_prepare_insert_keeps_existing_timestamp() {
        let row = prepare_insert(json!({"id": "a", "created_at": "2024-01-01T00:00:00Z"})).unwrap();
        assert_eq!(row["created_at"], "2024-01-01T00:00:00Z");

        let row = prepare_insert(json!({"id": "b"})).unwrap();
        assert!(row["created_at"].is_string());

        assert!(prepare_insert(json!([1, 2])).is_err());
    }
}
