//! File-backed key-value storage.

pub mod store;

pub use store::FileKeyValueStore;
