//! Student and billing entities.

pub mod bill;
pub mod model;

pub use bill::{BillStatus, StudentBill};
pub use model::Student;
