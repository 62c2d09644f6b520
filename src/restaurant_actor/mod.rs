//! # Restaurant Actor
//!
//! Manages restaurants and their menus. Menu availability is what the
//! order matcher reads to decide which restaurants can cook an order.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Restaurant`]
//! - [`error`] - [`RestaurantError`] type for type-safe error handling
//! - [`actions`] - [`RestaurantAction`] and [`RestaurantActionResult`] for menu management
//! - [`new()`] - Factory function that creates the actor and client

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RestaurantClient;
use crate::framework::ResourceActor;
use crate::model::{Restaurant, RestaurantId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates a new Restaurant actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Restaurant>, RestaurantClient) {
    let restaurant_id_counter = Arc::new(AtomicU32::new(1));
    let next_restaurant_id =
        move || RestaurantId(restaurant_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_restaurant_id);
    (actor, RestaurantClient::new(generic_client))
}
