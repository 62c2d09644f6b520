//! # Place Actor
//!
//! Backing store of the coordinate cache: one [`Place`] per exact address
//! string. Written only through upserts, never deleted.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::PlaceClient;
use crate::framework::ResourceActor;
use crate::model::Place;

/// Creates a new Place actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Place>, PlaceClient) {
    let (actor, generic_client) = ResourceActor::keyed(buffer_size);
    (actor, PlaceClient::new(generic_client))
}
