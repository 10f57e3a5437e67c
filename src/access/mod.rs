//! Data Access Module
//!
//! Entity-level reads and writes composed from the cache and the operation
//! wrapper.

mod models;
mod storefront;

pub use models::{
    Category, CategoryName, Order, OrderStatus, Product, ProductFilter, Profile, Role,
    StockDiscount,
};
pub use storefront::{
    CacheTtls, Fetched, StorefrontData, CATEGORIES_PREFIX, PRODUCTS_PREFIX, PRODUCT_PREFIX,
    PROFILE_PREFIX, STOCK_DISCOUNT_PROCEDURE,
};
