use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Coordinate, Place, PlaceCreate};
use crate::place_actor::PlaceError;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// The coordinate cache: address string to resolved position.
///
/// Lookups are exact-string; no normalization is applied to addresses.
/// Records without a coordinate read as cache misses.
#[derive(Clone)]
pub struct PlaceClient {
    inner: ResourceClient<Place>,
}

impl PlaceClient {
    pub fn new(inner: ResourceClient<Place>) -> Self {
        Self { inner }
    }

    /// Cached coordinate for `address`, if one is stored.
    #[instrument(skip(self))]
    pub async fn get(&self, address: &str) -> Result<Option<Coordinate>, PlaceError> {
        let place = self
            .inner
            .get(address.to_string())
            .await
            .map_err(map_error)?;
        Ok(place.and_then(|place| place.coordinate))
    }

    /// Bulk lookup. Addresses with no usable record are absent from the map.
    #[instrument(skip(self, addresses), fields(requested = addresses.len()))]
    pub async fn get_many(
        &self,
        addresses: Vec<String>,
    ) -> Result<HashMap<String, Coordinate>, PlaceError> {
        let places = self.inner.get_many(addresses).await.map_err(map_error)?;
        let found: HashMap<String, Coordinate> = places
            .into_iter()
            .filter_map(|place| place.coordinate.map(|c| (place.address, c)))
            .collect();
        debug!(found = found.len(), "Cache lookup");
        Ok(found)
    }

    /// Stores `coordinate` under `address`, replacing any previous value.
    #[instrument(skip(self))]
    pub async fn put(&self, address: &str, coordinate: Coordinate) -> Result<Place, PlaceError> {
        self.inner
            .upsert(PlaceCreate {
                address: address.to_string(),
                coordinate: Some(coordinate),
            })
            .await
            .map_err(map_error)
    }

    pub async fn list_places(&self) -> Result<Vec<Place>, PlaceError> {
        self.inner.list().await.map_err(map_error)
    }
}

fn map_error(e: FrameworkError) -> PlaceError {
    match e.into_entity_error::<PlaceError>() {
        Ok(err) => err,
        Err(other) => PlaceError::ActorCommunicationError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_get_many, expect_upsert};

    #[tokio::test]
    async fn test_get_many_skips_places_without_coordinate() {
        let (client, mut receiver) = create_mock_client::<Place>(10);
        let cache = PlaceClient::new(client);

        let task = tokio::spawn(async move {
            cache
                .get_many(vec!["A".into(), "B".into(), "C".into()])
                .await
        });

        let (ids, responder) = expect_get_many(&mut receiver).await.unwrap();
        assert_eq!(ids, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
        let a = Coordinate::new(55.75, 37.61).unwrap();
        responder
            .send(Ok(vec![Place::new("A", Some(a)), Place::new("B", None)]))
            .unwrap();

        let found = task.await.unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.get("A"), Some(&a));
    }

    #[tokio::test]
    async fn test_put_upserts_by_address() {
        let (client, mut receiver) = create_mock_client::<Place>(10);
        let cache = PlaceClient::new(client);
        let coordinate = Coordinate::new(59.93, 30.33).unwrap();

        let task = tokio::spawn(async move { cache.put("Nevsky 1", coordinate).await });

        let (params, responder) = expect_upsert(&mut receiver).await.unwrap();
        assert_eq!(params.address, "Nevsky 1");
        assert_eq!(params.coordinate, Some(coordinate));
        responder
            .send(Ok(Place::new(params.address, params.coordinate)))
            .unwrap();

        let place = task.await.unwrap().unwrap();
        assert_eq!(place.coordinate, Some(coordinate));
    }
}
