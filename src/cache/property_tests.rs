//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check freshness, key derivation and write semantics over
//! arbitrary inputs, driving time through a manual clock.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::{generate_key, CacheService};
use crate::clock::ManualClock;
use crate::storage::{MemoryStorage, Storage};

// == Strategies ==
/// Generates cache keys in the shape the data layer derives
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}_[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Row {
    id: u32,
    name: String,
    stock: u32,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (any::<u32>(), "[a-zA-Z ]{0,24}", 0u32..1000).prop_map(|(id, name, stock)| Row { id, name, stock })
}

fn payload_strategy() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(row_strategy(), 0..8)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

fn fixture(start_ms: i64) -> (CacheService, Arc<ManualClock>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(start_ms));
    (CacheService::new(storage.clone(), clock.clone()), clock, storage)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a payload and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), payload in payload_strategy()) {
        let (cache, _, _) = fixture(0);
        let read: Option<Vec<Row>> = block_on(async {
            cache.set(&key, &payload).await;
            cache.get(&key, Duration::from_secs(60)).await
        });
        prop_assert_eq!(read, Some(payload));
    }

    // A read strictly inside the TTL hits; a read at or past it misses and the
    // entry is gone from storage.
    #[test]
    fn prop_ttl_freshness(
        key in valid_key_strategy(),
        written_at in 0i64..1_000_000_000,
        ttl_ms in 1u64..10_000_000,
        offset in 0u64..20_000_000,
    ) {
        let (cache, clock, storage) = fixture(written_at);
        let ttl = Duration::from_millis(ttl_ms);

        let (read, raw) = block_on(async {
            cache.set(&key, &"payload").await;
            clock.advance(Duration::from_millis(offset));
            let read: Option<String> = cache.get(&key, ttl).await;
            let raw = storage.get_item(&key).await.unwrap();
            (read, raw)
        });

        if offset < ttl_ms {
            prop_assert_eq!(read.as_deref(), Some("payload"));
            prop_assert!(raw.is_some());
        } else {
            prop_assert!(read.is_none());
            prop_assert!(raw.is_none(), "stale entry should be evicted by the read");
        }
    }

    // Writing V1 then V2 under the same key leaves V2 readable.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        first in payload_strategy(),
        second in payload_strategy(),
    ) {
        let (cache, _, storage) = fixture(0);
        let (read, len) = block_on(async {
            cache.set(&key, &first).await;
            cache.set(&key, &second).await;
            let read: Option<Vec<Row>> = cache.get(&key, Duration::from_secs(60)).await;
            (read, storage.len().await)
        });
        prop_assert_eq!(read, Some(second));
        prop_assert_eq!(len, 1);
    }

    // Same prefix and params give the same key; changing the last param changes it.
    #[test]
    fn prop_key_determinism(
        prefix in "[a-z]{1,10}",
        a in "[a-zA-Z0-9]{1,10}",
        b in "[a-zA-Z0-9]{1,10}",
        c in "[a-zA-Z0-9]{1,10}",
    ) {
        prop_assert_eq!(generate_key(&prefix, [&a, &b]), generate_key(&prefix, [&a, &b]));
        if b != c {
            prop_assert_ne!(generate_key(&prefix, [&a, &b]), generate_key(&prefix, [&a, &c]));
        }
    }

    // Invalidating twice, or invalidating a key never written, always succeeds.
    #[test]
    fn prop_invalidate_idempotent(key in valid_key_strategy(), written in any::<bool>()) {
        let (cache, _, _) = fixture(0);
        let (first, second, read) = block_on(async {
            if written {
                cache.set(&key, &1u8).await;
            }
            let first = cache.invalidate(&key).await;
            let second = cache.invalidate(&key).await;
            let read: Option<u8> = cache.get(&key, Duration::from_secs(60)).await;
            (first, second, read)
        });
        prop_assert!(first);
        prop_assert!(second);
        prop_assert!(read.is_none());
    }
}
