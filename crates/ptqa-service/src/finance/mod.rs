//! Dashboard summary and cash-book writes.

pub mod dashboard;
pub mod transaction;

pub use dashboard::{DashboardService, DashboardSummary, MonthlyPoint};
pub use transaction::TransactionService;
