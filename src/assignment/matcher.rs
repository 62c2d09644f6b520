//! Candidate filtering by menu availability.

use crate::model::{Order, OrderStatus, Restaurant};

/// Restaurants able to cook `order`, in input order.
///
/// An order with an assigned restaurant is only ever available at that
/// restaurant. Otherwise a restaurant qualifies when every distinct product
/// of the order is on its menu and available. An order without items
/// matches every restaurant.
pub fn candidates<'a>(order: &Order, restaurants: &'a [Restaurant]) -> Vec<&'a Restaurant> {
    if let Some(assigned) = order.restaurant {
        return restaurants.iter().filter(|r| r.id == assigned).collect();
    }

    let products = order.product_ids();
    restaurants.iter().filter(|r| r.covers(&products)).collect()
}

/// True when observing the assignment must move the order to `Processing`.
pub fn requires_processing(order: &Order) -> bool {
    order.restaurant.is_some() && order.status == OrderStatus::Unprocessed
}
