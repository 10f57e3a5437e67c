//! Cache Service Module
//!
//! Expiring cache over a [`Storage`] collaborator. Every operation is
//! best-effort: storage and serialization faults are logged and degraded to a
//! miss (or a `false` flag), never returned to the caller.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::key::{generate_key, KEY_SEPARATOR};
use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats};
use crate::clock::{Clock, SystemClock};
use crate::storage::{MemoryStorage, Storage};

// == Cache Service ==
/// Read-through cache facade shared by the data-access layer.
///
/// Cloning is cheap; clones share storage, clock and counters.
#[derive(Debug, Clone)]
pub struct CacheService {
    /// Backing key-value store
    storage: Arc<dyn Storage>,
    /// Time source for write stamps and freshness checks
    clock: Arc<dyn Clock>,
    /// Optional prefix isolating this cache's keys inside shared storage
    namespace: Option<String>,
    /// Effectiveness counters
    stats: Arc<StatsCounters>,
}

impl CacheService {
    // == Constructor ==
    /// Creates an empty cache over `storage`, stamping entries with `clock`.
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            namespace: None,
            stats: Arc::new(StatsCounters::default()),
        }
    }

    /// Creates a cache over fresh in-memory storage and the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(SystemClock))
    }

    /// Prepends `namespace` to every key derived through [`CacheService::key`].
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// The clock used to stamp entries.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // == Key ==
    /// Derives a key for `prefix` and `params`, inside this cache's namespace.
    pub fn key<I, P>(&self, prefix: &str, params: I) -> String
    where
        I: IntoIterator<Item = P>,
        P: Display,
    {
        match &self.namespace {
            Some(namespace) => {
                let parts = std::iter::once(prefix.to_string())
                    .chain(params.into_iter().map(|p| p.to_string()));
                generate_key(namespace, parts)
            }
            None => generate_key(prefix, params),
        }
    }

    /// Key prefix shared by every key derived from `prefix`, separator included.
    pub fn prefix_of(&self, prefix: &str) -> String {
        let mut base = self.key(prefix, std::iter::empty::<&str>());
        base.push(KEY_SEPARATOR);
        base
    }

    // == Get ==
    /// Returns the cached payload if present and younger than `ttl`.
    ///
    /// A stale entry is removed as a side effect of the read. Absent,
    /// unreadable and stale entries all yield `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let raw = match self.storage.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                self.stats.record_miss();
                return None;
            }
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                self.stats.record_failure();
                self.stats.record_miss();
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, error = %err, "cache entry unreadable, treating as miss");
                self.stats.record_failure();
                self.stats.record_miss();
                return None;
            }
        };

        let now = self.clock.now_ms();
        if !entry.is_fresh(now, ttl) {
            debug!(key, age_ms = entry.age_ms(now), ttl_ms = ttl.as_millis() as u64, "cache entry stale");
            if let Err(err) = self.storage.remove_item(key).await {
                warn!(key, error = %err, "failed to evict stale cache entry");
                self.stats.record_failure();
            } else {
                self.stats.record_stale_eviction();
            }
            self.stats.record_miss();
            return None;
        }

        debug!(
            key,
            age_ms = entry.age_ms(now),
            remaining_ms = entry.remaining(now, ttl).as_millis() as u64,
            "cache hit"
        );
        self.stats.record_hit();
        Some(entry.payload)
    }

    // == Set ==
    /// Stores `payload` under `key`, stamped with the current time.
    ///
    /// Overwrites any previous entry. Returns `false` if the write failed.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, payload: &T) -> bool {
        let entry = CacheEntry::new(payload, self.clock.now_ms());
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "cache payload not serializable");
                self.stats.record_failure();
                return false;
            }
        };

        match self.storage.set_item(key, &raw).await {
            Ok(()) => {
                debug!(key, "cache write");
                self.stats.record_write();
                true
            }
            Err(err) => {
                warn!(key, error = %err, "cache write failed");
                self.stats.record_failure();
                false
            }
        }
    }

    // == Invalidate ==
    /// Removes `key` unconditionally. Invalidating an absent key succeeds.
    ///
    /// Returns `false` only if the storage reported a fault.
    pub async fn invalidate(&self, key: &str) -> bool {
        match self.storage.remove_item(key).await {
            Ok(()) => {
                debug!(key, "cache invalidated");
                true
            }
            Err(err) => {
                warn!(key, error = %err, "cache invalidation failed");
                self.stats.record_failure();
                false
            }
        }
    }

    // == Invalidate Prefix ==
    /// Removes every key starting with `prefix`, returning how many went.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let keys = match self.storage.keys().await {
            Ok(keys) => keys,
            Err(err) => {
                warn!(prefix, error = %err, "cache key listing failed");
                self.stats.record_failure();
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys.iter().filter(|k| k.starts_with(prefix)) {
            if self.invalidate(key).await {
                removed += 1;
            }
        }

        debug!(prefix, removed, "cache prefix invalidated");
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
