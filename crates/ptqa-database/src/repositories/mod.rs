//! Typed repositories, one per remote collection.

pub mod audit;
pub mod budget;
pub mod disbursement;
pub mod student;
pub mod student_bill;
pub mod transaction;
pub mod user;

pub use audit::AuditLogRepository;
pub use budget::BudgetRepository;
pub use disbursement::DisbursementRepository;
pub use student::StudentRepository;
pub use student_bill::StudentBillRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use ptqa_core::error::{AppError, ErrorKind};
use ptqa_core::result::AppResult;

/// Decode fetched rows, skipping rows that do not fit the entity shape.
pub(crate) fn decode_rows<T: DeserializeOwned>(collection: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(collection, error = %e, "Skipping malformed row");
                None
            }
        })
        .collect()
}

/// Decode a single row returned by a write.
pub(crate) fn decode_row<T: DeserializeOwned>(collection: &str, row: Value) -> AppResult<T> {
    serde_json::from_value(row).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Unexpected row shape returned from '{collection}'"),
            e,
        )
    })
}

/// Serialize an entity payload into a JSON row.
pub(crate) fn encode_row<T: serde::Serialize>(payload: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(payload)?)
}
