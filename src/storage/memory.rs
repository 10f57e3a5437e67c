//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::storage::Storage;

// == Memory Storage ==
/// Process-local storage; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_and_get() {
        let storage = MemoryStorage::new();
        storage.set_item("key1", "value1").await.unwrap();

        assert_eq!(
            storage.get_item("key1").await.unwrap(),
            Some("value1".to_string())
        );
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_get_missing() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_overwrite() {
        let storage = MemoryStorage::new();
        storage.set_item("key1", "a").await.unwrap();
        storage.set_item("key1", "b").await.unwrap();

        assert_eq!(storage.get_item("key1").await.unwrap().as_deref(), Some("b"));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_remove_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.set_item("key1", "a").await.unwrap();

        storage.remove_item("key1").await.unwrap();
        storage.remove_item("key1").await.unwrap();
        storage.remove_item("never_set").await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_rejects_empty_key() {
        let storage = MemoryStorage::new();
        let result = storage.set_item("", "value").await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_memory_keys() {
        let storage = MemoryStorage::new();
        storage.set_item("a", "1").await.unwrap();
        storage.set_item("b", "2").await.unwrap();

        let mut keys = storage.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
