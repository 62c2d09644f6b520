/// Represents a customer order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Custom actions ([`OrderAction`](crate::order_actor::OrderAction))
use crate::model::{ProductId, RestaurantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Lifecycle of an order. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Unprocessed,
    Processing,
    Collected,
    Cancelled,
    Closed,
}

impl OrderStatus {
    /// Terminal orders are set elsewhere and leave the dashboard worklist.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Collected | Self::Cancelled | Self::Closed)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        match self {
            Self::Unprocessed => next != Self::Unprocessed,
            Self::Processing => next.is_terminal(),
            Self::Collected | Self::Cancelled | Self::Closed => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unprocessed => "unprocessed",
            Self::Processing => "processing",
            Self::Collected => "collected",
            Self::Cancelled => "cancelled",
            Self::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// A single ordered product with the price it had when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub restaurant: Option<RestaurantId>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Unassigned, unvalidated order for unit tests; real orders come from
    /// `OrderCreate` through the Order actor.
    #[cfg(test)]
    pub fn new(id: OrderId, address: impl Into<String>, items: Vec<OrderItem>) -> Self {
        Self {
            id,
            firstname: String::new(),
            lastname: String::new(),
            phonenumber: String::new(),
            address: address.into(),
            restaurant: None,
            status: OrderStatus::Unprocessed,
            items,
        }
    }

    /// Distinct products referenced by the order's items.
    pub fn product_ids(&self) -> BTreeSet<ProductId> {
        self.items.iter().map(|item| item.product).collect()
    }

    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// One requested product in an [`OrderCreate`] payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductId,
    pub quantity: u32,
}

/// Payload for registering a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub products: Vec<OrderLine>,
}

/// Payload for correcting customer details of an existing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub address: Option<String>,
    pub phonenumber: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        use OrderStatus::*;
        assert!(Unprocessed.can_transition_to(Processing));
        assert!(Unprocessed.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Closed));
        assert!(!Processing.can_transition_to(Unprocessed));
        assert!(!Processing.can_transition_to(Processing));
        assert!(!Closed.can_transition_to(Processing));
        assert!(!Cancelled.can_transition_to(Closed));
    }

    #[test]
    fn test_total_price_and_distinct_products() {
        let order = Order::new(
            OrderId(1),
            "Tverskaya 1",
            vec![
                OrderItem { product: ProductId(1), quantity: 2, price: 150.0 },
                OrderItem { product: ProductId(2), quantity: 1, price: 99.5 },
                OrderItem { product: ProductId(1), quantity: 1, price: 150.0 },
            ],
        );
        assert_eq!(order.total_price(), 549.5);
        assert_eq!(order.product_ids().len(), 2);
    }
}
