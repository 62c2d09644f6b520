/// Represents a product in the catalog.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Product`](#impl-ActorEntity-for-Product) for details on:
/// - Creation parameters ([`ProductCreate`])
/// - Update parameters ([`ProductUpdate`])
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// A product category, shown next to catalog entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: Option<ProductCategory>,
    pub special_status: bool,
    pub description: String,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (typically set by the actor system)
    /// * `name` - Product name
    /// * `price` - Current catalog price
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: None,
            special_status: false,
            description: String::new(),
        }
    }
}

/// Payload for creating a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category: Option<ProductCategory>,
    pub special_status: bool,
    pub description: String,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            category: None,
            special_status: false,
            description: String::new(),
        }
    }
}

/// Payload for updating a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub price: Option<f64>,
    pub description: Option<String>,
}
