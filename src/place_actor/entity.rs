//! [`ActorEntity`] implementation for cached places.
//!
//! The address is the natural key. Upserting an existing address replaces
//! the coordinate and keeps the original `created_at`.

use super::PlaceError;
use crate::framework::ActorEntity;
use crate::model::{Place, PlaceCreate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Place {
    type Id = String;
    type Create = PlaceCreate;
    type Update = ();
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = PlaceError;

    fn from_create_params(address: String, params: PlaceCreate) -> Result<Self, PlaceError> {
        if address.trim().is_empty() {
            return Err(PlaceError::ValidationError("address is required".into()));
        }
        Ok(Place::new(address, params.coordinate))
    }

    fn natural_key(params: &PlaceCreate) -> Option<String> {
        Some(params.address.clone())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), PlaceError> {
        Ok(())
    }

    async fn on_upsert(&mut self, params: PlaceCreate, _ctx: &()) -> Result<(), PlaceError> {
        self.coordinate = params.coordinate;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), PlaceError> {
        Ok(())
    }
}
