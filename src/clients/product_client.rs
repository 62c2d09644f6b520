use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::ProductError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Changes the catalog price or description. Registered orders keep
    /// the price they were placed with.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Fetches the given products in one round trip. Unknown ids are skipped.
    #[instrument(skip(self))]
    pub async fn get_products(&self, ids: Vec<ProductId>) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.inner.get_many(ids).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<ProductError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_get_many};

    #[tokio::test]
    async fn test_get_products_sends_all_ids_at_once() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task = tokio::spawn(async move {
            product_client
                .get_products(vec![ProductId(1), ProductId(2)])
                .await
        });

        let (ids, responder) = expect_get_many(&mut receiver)
            .await
            .expect("Expected GetMany request");
        assert_eq!(ids, vec![ProductId(1), ProductId(2)]);
        responder
            .send(Ok(vec![Product::new(ProductId(1), "Burger", 250.0)]))
            .unwrap();

        let products = task.await.unwrap().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Burger");
    }

    #[tokio::test]
    async fn test_actor_failure_maps_to_communication_error() {
        let (client, receiver) = create_mock_client::<Product>(10);
        drop(receiver);
        let product_client = ProductClient::new(client);

        let err = product_client.get_products(vec![ProductId(1)]).await.unwrap_err();
        assert!(matches!(err, ProductError::ActorCommunicationError(_)));
    }
}
