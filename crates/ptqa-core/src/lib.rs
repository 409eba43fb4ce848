//! # ptqa-core
//!
//! Core crate for the PTQA finance dashboard. Contains the collaborator
//! traits (remote collections, persistent key-value storage, navigation),
//! configuration schemas, query/filter types, typed identifiers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other PTQA crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
