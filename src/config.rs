//! Configuration Module
//!
//! Handles loading cache and wrapper tuning from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::access::CacheTtls;
use crate::wrapper::WrapperSettings;

/// Cache and wrapper configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// TTL in seconds for product listings
    pub products_ttl: u64,
    /// TTL in seconds for a single product
    pub product_ttl: u64,
    /// TTL in seconds for the category list
    pub categories_ttl: u64,
    /// TTL in seconds for user profiles
    pub profile_ttl: u64,
    /// Operations slower than this many milliseconds are logged
    pub slow_operation_ms: u64,
    /// Remote operations are abandoned after this many milliseconds
    pub operation_timeout_ms: u64,
    /// Directory for persistent cache storage, in-memory when unset
    pub cache_dir: Option<PathBuf>,
    /// Prefix applied to every cache key
    pub cache_namespace: Option<String>,
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_PRODUCTS_SECS` - Product list TTL (default: 600)
    /// - `CACHE_TTL_PRODUCT_SECS` - Single product TTL (default: 900)
    /// - `CACHE_TTL_CATEGORIES_SECS` - Category list TTL (default: 3600)
    /// - `CACHE_TTL_PROFILE_SECS` - Profile TTL (default: 1800)
    /// - `SLOW_OPERATION_MS` - Slow operation threshold (default: 1000)
    /// - `OPERATION_TIMEOUT_MS` - Remote operation timeout (default: 15000)
    /// - `CACHE_DIR` - Persistent cache directory (default: unset, in-memory)
    /// - `CACHE_NAMESPACE` - Cache key namespace (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            products_ttl: parse_env("CACHE_TTL_PRODUCTS_SECS", defaults.products_ttl),
            product_ttl: parse_env("CACHE_TTL_PRODUCT_SECS", defaults.product_ttl),
            categories_ttl: parse_env("CACHE_TTL_CATEGORIES_SECS", defaults.categories_ttl),
            profile_ttl: parse_env("CACHE_TTL_PROFILE_SECS", defaults.profile_ttl),
            slow_operation_ms: parse_env("SLOW_OPERATION_MS", defaults.slow_operation_ms),
            operation_timeout_ms: parse_env("OPERATION_TIMEOUT_MS", defaults.operation_timeout_ms),
            cache_dir: non_empty_env("CACHE_DIR").map(PathBuf::from),
            cache_namespace: non_empty_env("CACHE_NAMESPACE"),
        }
    }

    /// Per-entity TTLs for the data-access layer.
    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            products: Duration::from_secs(self.products_ttl),
            product: Duration::from_secs(self.product_ttl),
            categories: Duration::from_secs(self.categories_ttl),
            profile: Duration::from_secs(self.profile_ttl),
        }
    }

    /// Timing settings for the operation wrapper.
    pub fn wrapper_settings(&self) -> WrapperSettings {
        WrapperSettings {
            slow_threshold: Duration::from_millis(self.slow_operation_ms),
            timeout: Duration::from_millis(self.operation_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            products_ttl: 600,
            product_ttl: 900,
            categories_ttl: 3600,
            profile_ttl: 1800,
            slow_operation_ms: 1000,
            operation_timeout_ms: 15_000,
            cache_dir: None,
            cache_namespace: None,
        }
    }
}
