use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, RestaurantId};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Registration logic (catalog lookup, price snapshot) happens in the Order
/// actor's `on_create` hook; this client only shapes requests and errors.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, order), fields(products = order.products.len()))]
    pub async fn register_order(&self, order: OrderCreate) -> Result<OrderId, OrderError> {
        info!("Sending register_order to actor");
        self.inner.create(order).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Orders that still belong on the dashboard, ordered by id.
    #[instrument(skip(self))]
    pub async fn list_active_orders(&self) -> Result<Vec<Order>, OrderError> {
        let orders = self.list().await?;
        Ok(orders.into_iter().filter(Order::is_active).collect())
    }

    #[instrument(skip(self))]
    pub async fn assign_restaurant(
        &self,
        id: OrderId,
        restaurant: RestaurantId,
    ) -> Result<RestaurantId, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::AssignRestaurant(restaurant))
            .await
        {
            Ok(OrderActionResult::AssignRestaurant(assigned)) => Ok(assigned),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Moves the order to `next`, returning the status it held before.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        debug!("Sending request");
        match self.inner.perform_action(id, OrderAction::Advance(next)).await {
            Ok(OrderActionResult::Advance { previous }) => Ok(previous),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Shorthand for advancing an order into `Processing`.
    pub async fn mark_processing(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        self.advance(id, OrderStatus::Processing).await
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("Unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::model::{OrderItem, ProductId};

    fn order(id: u32, status: OrderStatus) -> Order {
        let mut order = Order::new(
            OrderId(id),
            "Arbat 10",
            vec![OrderItem {
                product: ProductId(1),
                quantity: 1,
                price: 100.0,
            }],
        );
        order.status = status;
        order
    }

    #[tokio::test]
    async fn test_list_active_orders_drops_terminal_orders() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_list().return_ok(vec![
            order(1, OrderStatus::Unprocessed),
            order(2, OrderStatus::Collected),
            order(3, OrderStatus::Processing),
            order(4, OrderStatus::Cancelled),
            order(5, OrderStatus::Closed),
        ]);

        let client = OrderClient::new(mock.client());
        let active = client.list_active_orders().await.unwrap();

        let ids: Vec<OrderId> = active.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OrderId(1), OrderId(3)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_advance_surfaces_typed_transition_error() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidTransition {
                    from: OrderStatus::Closed,
                    to: OrderStatus::Processing,
                },
            )));

        let client = OrderClient::new(mock.client());
        let err = client.mark_processing(OrderId(1)).await.unwrap_err();

        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Closed,
                to: OrderStatus::Processing,
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_order_maps_to_not_found() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(42))
            .return_err(FrameworkError::NotFound("order_42".into()));

        let client = OrderClient::new(mock.client());
        let err = client
            .assign_restaurant(OrderId(42), RestaurantId(1))
            .await
            .unwrap_err();

        assert_eq!(err, OrderError::NotFound("order_42".into()));
    }
}
