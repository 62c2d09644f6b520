use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{MenuItem, ProductId, Restaurant, RestaurantCreate, RestaurantId, RestaurantUpdate};
use crate::restaurant_actor::{RestaurantAction, RestaurantActionResult, RestaurantError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Restaurant actor.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl RestaurantClient {
    pub fn new(inner: ResourceClient<Restaurant>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        params: RestaurantCreate,
    ) -> Result<RestaurantId, RestaurantError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Marks a product as available (or not) at a restaurant.
    #[instrument(skip(self))]
    pub async fn set_availability(
        &self,
        id: RestaurantId,
        product: ProductId,
        availability: bool,
    ) -> Result<MenuItem, RestaurantError> {
        debug!("Sending request");
        let action = RestaurantAction::SetAvailability {
            product,
            availability,
        };
        match self.inner.perform_action(id, action).await {
            Ok(RestaurantActionResult::SetAvailability(item)) => Ok(item),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[async_trait]
impl ActorClient<Restaurant> for RestaurantClient {
    type Error = RestaurantError;

    fn inner(&self) -> &ResourceClient<Restaurant> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<RestaurantError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => RestaurantError::NotFound(id),
            Err(other) => RestaurantError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};

    #[tokio::test]
    async fn test_set_availability_sends_action() {
        let (client, mut receiver) = create_mock_client::<Restaurant>(10);
        let restaurant_client = RestaurantClient::new(client);

        let task = tokio::spawn(async move {
            restaurant_client
                .set_availability(RestaurantId(3), ProductId(7), true)
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, RestaurantId(3));
        let RestaurantAction::SetAvailability {
            product,
            availability,
        } = action;
        assert_eq!(product, ProductId(7));
        assert!(availability);

        let item = MenuItem {
            product,
            availability,
        };
        responder
            .send(Ok(RestaurantActionResult::SetAvailability(item)))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap(), item);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_maps_to_not_found() {
        let (client, mut receiver) = create_mock_client::<Restaurant>(10);
        let restaurant_client = RestaurantClient::new(client);

        let task = tokio::spawn(async move {
            restaurant_client
                .set_availability(RestaurantId(9), ProductId(1), false)
                .await
        });

        let (_, _, responder) = expect_action(&mut receiver).await.unwrap();
        responder
            .send(Err(FrameworkError::NotFound("restaurant_9".into())))
            .unwrap();

        assert_eq!(
            task.await.unwrap().unwrap_err(),
            RestaurantError::NotFound("restaurant_9".into())
        );
    }
}
