//! Cache key derivation.

use std::fmt::Display;

use serde::Serialize;

use crate::error::Result;

/// Separator placed between the prefix and each parameter.
pub const KEY_SEPARATOR: char = '_';

/// Joins a prefix and its parameters into a cache key.
///
/// Pure and deterministic: the same prefix and parameters in the same order
/// always produce the same key. Callers must pass parameters in a stable
/// order; use [`stable_param`] for structured filters.
///
/// ```
/// use storefront_cache::cache::generate_key;
///
/// assert_eq!(generate_key("products", ["all"]), "products_all");
/// assert_eq!(generate_key("product", [7.to_string(), false.to_string()]), "product_7_false");
/// ```
pub fn generate_key<I, P>(prefix: &str, params: I) -> String
where
    I: IntoIterator<Item = P>,
    P: Display,
{
    let mut key = String::from(prefix);
    for param in params {
        key.push(KEY_SEPARATOR);
        key.push_str(&param.to_string());
    }
    key
}

/// Serializes a structured parameter (such as a filter) into a key fragment.
///
/// Struct fields serialize in declaration order, so equal values always yield
/// equal fragments.
pub fn stable_param<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
