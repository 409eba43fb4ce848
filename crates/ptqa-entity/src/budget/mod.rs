//! Fund budget and disbursement entities.

pub mod disbursement;
pub mod model;
pub mod status;

pub use disbursement::{CreateDisbursement, Disbursement};
pub use model::{Budget, CreateBudget};
pub use status::{BudgetDecision, BudgetStatus};
