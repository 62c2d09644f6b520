/// A cached geocoding result, keyed by the exact address string.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait
/// with the address as natural key, so it is stored by a keyed
/// [`ResourceActor`](crate::framework::ResourceActor) and written with upserts.
use crate::model::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    /// Absent for records whose geocode never produced a position.
    pub coordinate: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
}

impl Place {
    pub fn new(address: impl Into<String>, coordinate: Option<Coordinate>) -> Self {
        Self {
            address: address.into(),
            coordinate,
            created_at: Utc::now(),
        }
    }
}

/// Payload for writing a place; also the upsert payload.
#[derive(Debug, Clone)]
pub struct PlaceCreate {
    pub address: String,
    pub coordinate: Option<Coordinate>,
}
