//! In-memory key-value storage.

pub mod store;

pub use store::MemoryKeyValueStore;
