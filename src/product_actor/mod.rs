//! # Product Actor
//!
//! Owns the product catalog. Products have no dependencies (`Context = ()`)
//! and no custom actions; orders read them to snapshot prices and the
//! catalog listing reads them to show what can be bought.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProductClient;
use crate::framework::ResourceActor;
use crate::model::{Product, ProductId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates a new Product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let product_id_counter = Arc::new(AtomicU32::new(1));
    let next_product_id = move || ProductId(product_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_product_id);
    (actor, ProductClient::new(generic_client))
}
