/// Represents a restaurant together with its menu.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Restaurant`](#impl-ActorEntity-for-Restaurant) for details on:
/// - Creation parameters ([`RestaurantCreate`])
/// - Update parameters ([`RestaurantUpdate`])
/// - Custom actions ([`RestaurantAction`](crate::restaurant_actor::RestaurantAction))
use crate::model::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Type-safe identifier for Restaurants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RestaurantId(pub u32);

impl From<u32> for RestaurantId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "restaurant_{}", self.0)
    }
}

/// One (restaurant, product) menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub product: ProductId,
    pub availability: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    /// Keyed by product, so a restaurant holds at most one entry per product.
    pub menu: BTreeMap<ProductId, MenuItem>,
}

impl Restaurant {
    pub fn new(id: RestaurantId, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            contact_phone: String::new(),
            menu: BTreeMap::new(),
        }
    }

    /// Builder used by tests and seed data.
    pub fn with_menu_item(mut self, product: ProductId, availability: bool) -> Self {
        self.set_availability(product, availability);
        self
    }

    /// Inserts or replaces the menu entry for `product`.
    pub fn set_availability(&mut self, product: ProductId, availability: bool) -> MenuItem {
        let item = MenuItem {
            product,
            availability,
        };
        self.menu.insert(product, item);
        item
    }

    /// Missing menu entries read as unavailable.
    pub fn is_available(&self, product: ProductId) -> bool {
        self.menu
            .get(&product)
            .map(|item| item.availability)
            .unwrap_or(false)
    }

    /// True when every product in `products` is on the menu and available.
    pub fn covers(&self, products: &BTreeSet<ProductId>) -> bool {
        products.iter().all(|product| self.is_available(*product))
    }
}

/// Payload for creating a new restaurant.
#[derive(Debug, Clone)]
pub struct RestaurantCreate {
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub menu: Vec<MenuItem>,
}

impl RestaurantCreate {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            contact_phone: String::new(),
            menu: Vec::new(),
        }
    }

    pub fn with_menu_item(mut self, product: ProductId, availability: bool) -> Self {
        self.menu.push(MenuItem {
            product,
            availability,
        });
        self
    }
}

/// Payload for updating restaurant details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
}
