//! Custom actions for the Order actor.

use crate::model::{OrderStatus, RestaurantId};

/// Custom actions for Order entities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Assigns the restaurant that will cook the order.
    AssignRestaurant(RestaurantId),
    /// Moves the order forward in its lifecycle.
    Advance(OrderStatus),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// The restaurant now assigned to the order.
    AssignRestaurant(RestaurantId),
    /// The status the order held before the change.
    Advance { previous: OrderStatus },
}
