//! Shared domain types used across all PTQA crates.

pub mod filter;
pub mod id;
pub mod query;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::*;
pub use query::CollectionQuery;
pub use sorting::{SortDirection, SortField};
