//! [`ActorEntity`] implementation for the Product domain type.

use super::ProductError;
use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;

fn validate_price(price: f64) -> Result<f64, ProductError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ProductError::ValidationError(format!("invalid price: {price}")))
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = ProductError;

    /// Creates a new Product from creation parameters.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("name is required".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            price: validate_price(params.price)?,
            category: params.category,
            special_status: params.special_status,
            description: params.description,
        })
    }

    /// Handles updates to the Product entity.
    ///
    /// # Fields Updated
    /// - `price`: Catalog price; orders already placed keep their own copy
    /// - `description`: Free-form text
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        if let Some(price) = update.price {
            self.price = validate_price(price)?;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), ProductError> {
        Ok(())
    }
}
