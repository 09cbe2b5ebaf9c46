//! Partitioned response cache for pokepwa.
//!
//! This crate provides the storage capability the offline worker runs against:
//! a set of named partitions, each mapping a request identity (method + URL) to
//! a buffered response snapshot. It offers a trait-based API with pluggable
//! backends.
//!
//! Currently supported backends:
//! - In-memory (`InMemoryCacheStorage`)

mod cache;
mod error;
mod http_cache;
mod memory;

pub use cache::{RequestKey, Response};
pub use error::CacheError;
pub use http_cache::{Cache, CacheStorage};

pub use memory::{InMemoryCache, InMemoryCacheStorage};

// Re-export
pub use bytes;
pub use http;
pub use url;
