//! Storefront Cache - client-side read-through cache for remote data access
//!
//! Wraps calls to a hosted backend with an expiring local cache, a uniform
//! result shape, timeouts and slow-operation logging.

pub mod access;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod remote;
pub mod storage;
pub mod telemetry;
pub mod wrapper;

pub use access::{Fetched, StorefrontData};
pub use cache::CacheService;
pub use config::Config;
pub use telemetry::init_tracing;
pub use wrapper::{ErrorInfo, OperationResult, OperationWrapper};
