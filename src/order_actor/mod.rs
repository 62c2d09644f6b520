//! Order-specific resource logic and entity implementation.
//!
//! The Order actor depends on the product catalog: its context is a
//! [`ProductClient`](crate::clients::ProductClient), used while registering an order.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::{Order, OrderId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates a new Order actor and its client.
///
/// Start it with `actor.run(product_client)`.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let order_id_counter = Arc::new(AtomicU32::new(1));
    let next_order_id = move || OrderId(order_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_order_id);
    (actor, OrderClient::new(generic_client))
}
