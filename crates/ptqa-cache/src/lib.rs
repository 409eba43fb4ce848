//! # ptqa-cache
//!
//! Durable key-value storage for client state: the persisted session,
//! the notification read set, and last-known-good collection snapshots.
//! Two backends:
//!
//! - **file**: a single JSON document on disk, rewritten atomically
//! - **memory**: process-local, backed by [dashmap](https://crates.io/crates/dashmap)
//!
//! The backend is selected at runtime based on configuration.

pub mod file;
pub mod keys;
pub mod memory;
pub mod provider;

pub use provider::LocalStorage;
