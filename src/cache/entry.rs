//! Cache Entry Module
//!
//! Defines the serialized shape of a cached payload and its freshness rule.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload together with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// The stored value
    pub payload: T,
    /// Write timestamp (Unix milliseconds), set once when the entry is created
    pub stored_at: i64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry stamped with `stored_at`.
    pub fn new(payload: T, stored_at: i64) -> Self {
        Self { payload, stored_at }
    }

    // == Age ==
    /// Milliseconds elapsed between the write and `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.stored_at)
    }

    // == Is Fresh ==
    /// Checks the entry against a caller-supplied TTL.
    ///
    /// Boundary condition: an entry whose age equals the TTL is stale, so a
    /// zero TTL never yields a fresh entry.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.age_ms(now_ms) < ttl_ms
    }

    // == Remaining ==
    /// Time left before the entry goes stale, zero when already stale.
    pub fn remaining(&self, now_ms: i64, ttl: Duration) -> Duration {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let left = ttl_ms.saturating_sub(self.age_ms(now_ms));
        Duration::from_millis(left.max(0) as u64)
    }
}
