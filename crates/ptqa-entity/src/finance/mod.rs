//! Cash-book entities.

pub mod transaction;

pub use transaction::{CreateTransaction, Transaction, TransactionType};
