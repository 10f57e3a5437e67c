//! Storefront entities as the backend stores them.
//!
//! Field names follow the backend's column names through serde renames, so
//! the same types decode remote rows and round-trip through the cache.

use serde::{Deserialize, Serialize};

// == Product ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "categoria_id", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "imagen_url", default)]
    pub image_url: Option<String>,
    #[serde(rename = "laboratorio", default)]
    pub laboratory: Option<String>,
    #[serde(rename = "dosis", default)]
    pub dosage: Option<String>,
    #[serde(rename = "necesita_receta", default)]
    pub requires_prescription: bool,
    /// Embedded category row, present when the query joins it
    #[serde(rename = "categorias", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryName>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryName {
    #[serde(rename = "nombre")]
    pub name: String,
}

// == Category ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

// == Product Filter ==
/// Narrowing applied to a product listing.
///
/// Field order is part of the cache key; do not reorder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Also list products with no stock left
    pub include_out_of_stock: bool,
    pub category_id: Option<i64>,
    /// Substring matched against name and description
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl ProductFilter {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

// == Profile ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    #[serde(rename = "cliente")]
    Customer,
    #[serde(rename = "repartidor")]
    Driver,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(rename = "nombre_completo", default)]
    pub full_name: Option<String>,
    #[serde(rename = "rol", default)]
    pub role: Role,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// == Order ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "confirmado")]
    Confirmed,
    #[serde(rename = "en_camino")]
    InTransit,
    #[serde(rename = "entregado")]
    Delivered,
    #[serde(rename = "cancelado")]
    Cancelled,
    #[serde(rename = "problema")]
    Problem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "cliente_id", default)]
    pub customer_id: Option<String>,
    #[serde(rename = "repartidor_id", default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
}

/// Reply of the stock discount procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDiscount {
    pub success: bool,
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
