//! Storage Module
//!
//! Persistent key-value collaborator the cache is layered on. The cache only
//! needs string values under string keys; every call is async and fallible.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;

use crate::error::Result;

// == Storage Trait ==
/// Async string key-value store.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Reads the value stored under `key`, `None` when absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every stored key, in no particular order.
    async fn keys(&self) -> Result<Vec<String>>;
}
