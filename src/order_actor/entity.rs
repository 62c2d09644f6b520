//! [`ActorEntity`] implementation for the Order domain type.
//!
//! Registration validates the customer card and the product list
//! synchronously, then `on_create` consults the product catalog (the
//! injected [`ProductClient`]) to reject unknown products and to copy each
//! product's current price onto its order item.

use super::{OrderAction, OrderActionResult, OrderError};
use crate::clients::ProductClient;
use crate::framework::ActorEntity;
use crate::model::{Order, OrderCreate, OrderId, OrderItem, OrderStatus, OrderUpdate, ProductId};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

fn required(field: &str, value: String) -> Result<String, OrderError> {
    if value.trim().is_empty() {
        Err(OrderError::ValidationError(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = ProductClient;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        let firstname = required("firstname", params.firstname)?;
        let address = required("address", params.address)?;
        let phonenumber = required("phonenumber", params.phonenumber)?;

        if params.products.is_empty() {
            return Err(OrderError::ValidationError(
                "products must not be empty".into(),
            ));
        }
        if let Some(line) = params.products.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "quantity for {} must be positive",
                line.product
            )));
        }

        // Prices are filled in by on_create from the catalog.
        let items = params
            .products
            .into_iter()
            .map(|line| OrderItem {
                product: line.product,
                quantity: line.quantity,
                price: 0.0,
            })
            .collect();

        Ok(Self {
            id,
            firstname,
            lastname: params.lastname,
            phonenumber,
            address,
            restaurant: None,
            status: OrderStatus::Unprocessed,
            items,
        })
    }

    async fn on_create(&mut self, products: &ProductClient) -> Result<(), OrderError> {
        let ids: Vec<ProductId> = self.product_ids().into_iter().collect();
        let prices: HashMap<ProductId, f64> = products
            .get_products(ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product.price))
            .collect();

        for item in &mut self.items {
            let Some(price) = prices.get(&item.product) else {
                return Err(OrderError::InvalidProduct(item.product.to_string()));
            };
            item.price = *price;
        }
        debug!(order_id = %self.id, total = self.total_price(), "Prices snapshotted");
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &ProductClient) -> Result<(), OrderError> {
        // Validate everything before touching the stored order.
        let address = update.address.map(|a| required("address", a)).transpose()?;
        let phonenumber = update
            .phonenumber
            .map(|p| required("phonenumber", p))
            .transpose()?;
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(phonenumber) = phonenumber {
            self.phonenumber = phonenumber;
        }
        Ok(())
    }

    /// Handles custom actions for the Order entity.
    ///
    /// # Actions
    /// - `AssignRestaurant`: only while the order is still active
    /// - `Advance`: forward-only status change
    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &ProductClient,
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::AssignRestaurant(restaurant) => {
                if !self.is_active() {
                    return Err(OrderError::ValidationError(format!(
                        "order is {}",
                        self.status
                    )));
                }
                self.restaurant = Some(restaurant);
                Ok(OrderActionResult::AssignRestaurant(restaurant))
            }
            OrderAction::Advance(next) => {
                if !self.status.can_transition_to(next) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to: next,
                    });
                }
                let previous = std::mem::replace(&mut self.status, next);
                Ok(OrderActionResult::Advance { previous })
            }
        }
    }
}
