//! [`ActorEntity`] implementation for the Restaurant domain type.

use super::{RestaurantAction, RestaurantActionResult, RestaurantError};
use crate::framework::ActorEntity;
use crate::model::{Restaurant, RestaurantCreate, RestaurantId, RestaurantUpdate};
use async_trait::async_trait;
use std::collections::BTreeMap;

fn required(field: &str, value: String) -> Result<String, RestaurantError> {
    if value.trim().is_empty() {
        Err(RestaurantError::ValidationError(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

#[async_trait]
impl ActorEntity for Restaurant {
    type Id = RestaurantId;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;
    type Action = RestaurantAction;
    type ActionResult = RestaurantActionResult;
    type Context = ();
    type Error = RestaurantError;

    /// Creates a new Restaurant. Duplicate products in the initial menu
    /// collapse into one entry; the last one wins.
    fn from_create_params(
        id: RestaurantId,
        params: RestaurantCreate,
    ) -> Result<Self, RestaurantError> {
        let mut restaurant = Self {
            id,
            name: required("name", params.name)?,
            address: required("address", params.address)?,
            contact_phone: params.contact_phone,
            menu: BTreeMap::new(),
        };
        for item in params.menu {
            restaurant.set_availability(item.product, item.availability);
        }
        Ok(restaurant)
    }

    async fn on_update(
        &mut self,
        update: RestaurantUpdate,
        _ctx: &(),
    ) -> Result<(), RestaurantError> {
        if let Some(name) = update.name {
            self.name = required("name", name)?;
        }
        if let Some(address) = update.address {
            self.address = required("address", address)?;
        }
        if let Some(phone) = update.contact_phone {
            self.contact_phone = phone;
        }
        Ok(())
    }

    /// Handles custom actions for the Restaurant entity.
    ///
    /// # Actions
    /// - `SetAvailability`: upserts the menu entry for one product
    async fn handle_action(
        &mut self,
        action: RestaurantAction,
        _ctx: &(),
    ) -> Result<RestaurantActionResult, RestaurantError> {
        match action {
            RestaurantAction::SetAvailability {
                product,
                availability,
            } => {
                let item = self.set_availability(product, availability);
                Ok(RestaurantActionResult::SetAvailability(item))
            }
        }
    }
}
