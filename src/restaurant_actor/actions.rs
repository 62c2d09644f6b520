//! Custom actions for the Restaurant actor.
//!
//! Menu entries live inside the restaurant, so changing one is an action on
//! the owning [`Restaurant`](crate::model::Restaurant) rather than a
//! resource of its own.

use crate::model::{MenuItem, ProductId};

/// Custom actions for Restaurant entities.
#[derive(Debug, Clone)]
pub enum RestaurantAction {
    /// Creates or replaces the single menu entry for a product.
    SetAvailability {
        product: ProductId,
        availability: bool,
    },
}

/// Results from RestaurantActions - variants match 1:1 with RestaurantAction
#[derive(Debug, Clone)]
pub enum RestaurantActionResult {
    /// The menu entry as stored after the change.
    SetAvailability(MenuItem),
}
