//! Storefront data access.
//!
//! Every read follows the same read-through path: derive a key, try the
//! cache with the entity's TTL, otherwise run the remote read through the
//! wrapper and cache a successful non-empty payload. Writes invalidate the
//! keys a later read could otherwise serve stale.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::access::models::{
    Category, Order, OrderStatus, Product, ProductFilter, Profile, StockDiscount,
};
use crate::cache::{stable_param, CacheService};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{BackendError, Cardinality, Mutation, Query, RemoteExecutor};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::wrapper::{ErrorInfo, OperationMetadata, OperationResult, OperationWrapper};

pub const PRODUCTS_PREFIX: &str = "products";
pub const PRODUCT_PREFIX: &str = "product";
pub const CATEGORIES_PREFIX: &str = "categories";
pub const PROFILE_PREFIX: &str = "profile";

/// Remote procedure that takes an order's items out of stock.
pub const STOCK_DISCOUNT_PROCEDURE: &str = "descontar_stock_pedido";

const PRODUCT_COLUMNS: &str = "*, categorias(nombre)";

// == Cache TTLs ==
/// How long each entity stays fresh, tuned to how often it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub products: Duration,
    pub product: Duration,
    pub categories: Duration,
    pub profile: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            products: Duration::from_secs(10 * 60),
            product: Duration::from_secs(15 * 60),
            categories: Duration::from_secs(60 * 60),
            profile: Duration::from_secs(30 * 60),
        }
    }
}

// == Fetched ==
/// A read result tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub result: OperationResult<T>,
    /// True when served from the cache without a remote call
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    pub fn data(&self) -> Option<&T> {
        self.result.data()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.result.error()
    }

    pub fn into_result(self) -> std::result::Result<Option<T>, ErrorInfo> {
        self.result.into_result()
    }
}

// == Storefront Data ==
/// Cached access to products, categories, profiles and orders.
#[derive(Debug, Clone)]
pub struct StorefrontData {
    cache: CacheService,
    wrapper: OperationWrapper,
    ttls: CacheTtls,
}

impl StorefrontData {
    pub fn new(cache: CacheService, wrapper: OperationWrapper, ttls: CacheTtls) -> Self {
        Self {
            cache,
            wrapper,
            ttls,
        }
    }

    /// Builds the whole stack from configuration around `executor`.
    ///
    /// Uses file storage under `cache_dir` when configured, memory otherwise.
    pub async fn from_config(config: &Config, executor: Arc<dyn RemoteExecutor>) -> Result<Self> {
        let storage: Arc<dyn Storage> = match &config.cache_dir {
            Some(dir) => Arc::new(FileStorage::open(dir).await?),
            None => Arc::new(MemoryStorage::new()),
        };
        let clock = Arc::new(SystemClock);

        let mut cache = CacheService::new(storage, clock.clone());
        if let Some(namespace) = &config.cache_namespace {
            cache = cache.with_namespace(namespace.clone());
        }
        let wrapper = OperationWrapper::new(executor, config.wrapper_settings()).with_clock(clock);

        info!(
            persistent = config.cache_dir.is_some(),
            "storefront data access initialized"
        );
        Ok(Self::new(cache, wrapper, config.ttls()))
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    // == Read Through ==
    async fn read_through<T, F>(
        &self,
        operation_name: &str,
        key: Option<String>,
        ttl: Duration,
        fetch: F,
    ) -> Fetched<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = OperationResult<T>>,
    {
        if let Some(key) = &key {
            let started = Instant::now();
            if let Some(data) = self.cache.get::<T>(key, ttl).await {
                debug!(operation = operation_name, key = key.as_str(), "served from cache");
                return Fetched {
                    result: OperationResult::Success {
                        data: Some(data),
                        metadata: OperationMetadata {
                            operation_name: operation_name.to_string(),
                            duration_ms: started.elapsed().as_millis() as u64,
                            timestamp: self.cache.clock().now(),
                        },
                    },
                    from_cache: true,
                };
            }
        }

        let result = fetch.await;
        if let (Some(key), OperationResult::Success { data: Some(data), .. }) = (&key, &result) {
            self.cache.set(key, data).await;
        }

        Fetched {
            result,
            from_cache: false,
        }
    }

    // == Products ==
    /// Lists products matching `filter`, ordered by name.
    pub async fn products(&self, filter: &ProductFilter) -> Fetched<Vec<Product>> {
        let key = if filter.is_default() {
            Some(self.cache.key(PRODUCTS_PREFIX, ["all"]))
        } else {
            match stable_param(filter) {
                Ok(param) => Some(self.cache.key(PRODUCTS_PREFIX, [param])),
                Err(err) => {
                    warn!(error = %err, "product filter not serializable, bypassing cache");
                    None
                }
            }
        };

        let mut query = Query::from("productos").select(PRODUCT_COLUMNS);
        if !filter.include_out_of_stock {
            query = query.gt("stock", 0);
        }
        if let Some(category_id) = filter.category_id {
            query = query.eq("categoria_id", category_id);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.search(&["nombre", "descripcion"], search);
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        let query = query.order("nombre", true);

        let name = "load products";
        self.read_through(name, key, self.ttls.products, self.wrapper.select(name, query))
            .await
    }

    // == Product ==
    /// Loads one product; unless `include_out_of_stock`, only if it has stock.
    pub async fn product(&self, product_id: i64, include_out_of_stock: bool) -> Fetched<Product> {
        let key = self.cache.key(
            PRODUCT_PREFIX,
            [product_id.to_string(), include_out_of_stock.to_string()],
        );

        let mut query = Query::from("productos")
            .select(PRODUCT_COLUMNS)
            .eq("id", product_id);
        if !include_out_of_stock {
            query = query.gt("stock", 0);
        }

        let name = "load product";
        self.read_through(
            name,
            Some(key),
            self.ttls.product,
            self.wrapper.select(name, query.single()),
        )
        .await
    }

    // == Categories ==
    pub async fn categories(&self) -> Fetched<Vec<Category>> {
        let key = self.cache.key(CATEGORIES_PREFIX, ["all"]);
        let query = Query::from("categorias")
            .select("id, nombre")
            .order("nombre", true);

        let name = "load categories";
        self.read_through(name, Some(key), self.ttls.categories, self.wrapper.select(name, query))
            .await
    }

    // == Profile ==
    /// Loads a user's profile. A missing profile is a success with no data.
    ///
    /// With `use_cache` false the cache is neither read nor written.
    pub async fn profile(&self, user_id: &str, use_cache: bool) -> Fetched<Profile> {
        let key = use_cache.then(|| self.profile_key(user_id));
        let query = Query::from("perfiles").eq("id", user_id).maybe_single();

        let name = "load profile";
        self.read_through(name, key, self.ttls.profile, self.wrapper.select(name, query))
            .await
    }

    /// Creates or replaces a profile, then refreshes its cache entry.
    pub async fn upsert_profile(&self, profile: &Profile) -> OperationResult<Profile> {
        let name = "upsert profile";
        let values = match serde_json::to_value(profile) {
            Ok(values) => values,
            Err(err) => {
                return OperationResult::Failure(ErrorInfo::unexpected(
                    name,
                    err,
                    self.cache.clock().now(),
                ))
            }
        };

        let mutation = Mutation::upsert("perfiles", values).returning(Cardinality::Single);
        let result: OperationResult<Profile> = self.wrapper.modify(name, mutation).await;

        if let OperationResult::Success { data, .. } = &result {
            let key = self.profile_key(&profile.id);
            self.cache.invalidate(&key).await;
            if let Some(saved) = data {
                self.cache.set(&key, saved).await;
            }
        }
        result
    }

    fn profile_key(&self, user_id: &str) -> String {
        self.cache.key(PROFILE_PREFIX, [user_id])
    }

    // == Orders ==
    /// Cancels an order that is still pending.
    pub async fn cancel_order(&self, order_id: i64) -> OperationResult<Order> {
        let mutation = Mutation::update("pedidos", json!({ "estado": OrderStatus::Cancelled }))
            .eq("id", order_id)
            .eq("estado", json!(OrderStatus::Pending))
            .returning(Cardinality::Single);

        self.wrapper.modify("cancel order", mutation).await
    }

    /// Moves an order assigned to `driver_id` to `status`.
    ///
    /// Delivering an order first takes its items out of stock through the
    /// stock procedure; if that fails the status is left untouched. Once
    /// stock has moved, every cached product entry is dropped.
    pub async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        driver_id: &str,
    ) -> OperationResult<Order> {
        if status == OrderStatus::Delivered {
            if let Err(error) = self.discount_stock(order_id).await {
                return OperationResult::Failure(error);
            }
            self.invalidate_products().await;
        }

        let mutation = Mutation::update("pedidos", json!({ "estado": status }))
            .eq("id", order_id)
            .eq("repartidor_id", driver_id)
            .returning(Cardinality::Single);

        self.wrapper.modify("update order status", mutation).await
    }

    async fn discount_stock(&self, order_id: i64) -> std::result::Result<(), ErrorInfo> {
        let name = "discount order stock";
        let mut params = Map::new();
        params.insert("pedido_id".to_string(), Value::from(order_id));

        let reply: Option<StockDiscount> = self
            .wrapper
            .rpc(name, STOCK_DISCOUNT_PROCEDURE, params)
            .await
            .into_result()?;

        match reply {
            Some(StockDiscount { success: true, message, .. }) => {
                info!(order_id, message = message.as_deref().unwrap_or(""), "stock discounted");
                Ok(())
            }
            other => {
                let reason = other
                    .and_then(|reply| reply.error)
                    .unwrap_or_else(|| "stock discount reported failure".to_string());
                warn!(order_id, reason = reason.as_str(), "stock discount refused");
                Err(ErrorInfo::backend(
                    name,
                    &BackendError::new(reason),
                    self.cache.clock().now(),
                ))
            }
        }
    }

    /// Drops every cached product listing and single product entry.
    pub async fn invalidate_products(&self) -> usize {
        let listings = self.cache.invalidate_prefix(&self.cache.prefix_of(PRODUCTS_PREFIX)).await;
        let singles = self.cache.invalidate_prefix(&self.cache.prefix_of(PRODUCT_PREFIX)).await;
        listings + singles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.products, Duration::from_secs(600));
        assert_eq!(ttls.product, Duration::from_secs(900));
        assert_eq!(ttls.categories, Duration::from_secs(3600));
        assert_eq!(ttls.profile, Duration::from_secs(1800));
    }

    #[test]
    fn test_default_ttls_match_config() {
        assert_eq!(Config::default().ttls(), CacheTtls::default());
    }
}
