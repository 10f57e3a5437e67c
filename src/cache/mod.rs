//! Cache Module
//!
//! Expiring key-value cache layered over a persistent [`Storage`](crate::storage::Storage)
//! collaborator. Staleness is evaluated lazily on read; there is no background
//! eviction.

mod entry;
mod key;
mod service;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{generate_key, stable_param, KEY_SEPARATOR};
pub use service::CacheService;
pub use stats::CacheStats;
