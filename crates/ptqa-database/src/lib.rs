//! # ptqa-database
//!
//! Access to the hosted backend's collections: the generic
//! [`CollectionAdapter`](ptqa_core::traits::CollectionAdapter)
//! implementations (REST, in-memory, cache-fallback) and one typed
//! repository per collection.

pub mod adapters;
pub mod connection;
pub mod repositories;

pub use connection::Backend;
