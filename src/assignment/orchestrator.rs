//! One assignment pass over the active worklist.
//!
//! The pass is strictly sequential: every cache request, geocoder call and
//! status update is awaited before the next one starts. Coordinates live in
//! a [`PlaceMap`] owned by the pass, so an address is looked up once and an
//! address that failed to resolve is not retried until the next pass.

use super::{matcher, ranker, RankedRestaurant};
use crate::clients::{ActorClient, OrderClient, PlaceClient, RestaurantClient};
use crate::geocoder::{GeocodeError, Geocoder};
use crate::model::{Coordinate, OrderId, OrderStatus, RestaurantId};
use crate::order_actor::OrderError;
use crate::place_actor::PlaceError;
use crate::restaurant_actor::RestaurantError;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why an address has no coordinate in this pass. Logged, never returned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("no geocoder match for {0:?}")]
    UnresolvedAddress(String),
}

/// Failures that abort the pass.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssignmentError {
    #[error("loading restaurants failed: {0}")]
    Restaurants(#[from] RestaurantError),

    #[error("order update failed: {0}")]
    Orders(#[from] OrderError),

    #[error("coordinate cache failed: {0}")]
    Cache(#[from] PlaceError),
}

/// Dashboard record of one order after the pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAssignment {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub address: String,
    pub restaurant: Option<RestaurantId>,
    pub total_price: f64,
    /// Nearest first. Empty when nothing matches or the address is unresolved.
    pub restaurants: Vec<RankedRestaurant>,
}

/// Pass-scoped address to coordinate map.
#[derive(Debug, Default)]
pub struct PlaceMap {
    resolved: HashMap<String, Coordinate>,
    unresolved: HashSet<String>,
}

impl PlaceMap {
    /// Seeds the map with coordinates already present in the cache.
    pub fn new(cached: HashMap<String, Coordinate>) -> Self {
        Self {
            resolved: cached,
            unresolved: HashSet::new(),
        }
    }

    pub fn get(&self, address: &str) -> Option<Coordinate> {
        self.resolved.get(address).copied()
    }

    /// Coordinate for `address`, geocoding and caching it on a miss.
    ///
    /// Only a failed cache write is an error; geocoder failures and empty
    /// results mark the address unresolved for the rest of the pass.
    pub async fn resolve(
        &mut self,
        address: &str,
        geocoder: &dyn Geocoder,
        cache: &PlaceClient,
    ) -> Result<Option<Coordinate>, PlaceError> {
        if let Some(coordinate) = self.get(address) {
            return Ok(Some(coordinate));
        }
        if self.unresolved.contains(address) {
            debug!(address, "Skipping address that failed earlier in this pass");
            return Ok(None);
        }

        match geocode(geocoder, address).await {
            Ok(coordinate) => {
                cache.put(address, coordinate).await?;
                self.resolved.insert(address.to_string(), coordinate);
                Ok(Some(coordinate))
            }
            Err(e) => {
                warn!(address, error = %e, "Coordinate unresolved");
                self.unresolved.insert(address.to_string());
                Ok(None)
            }
        }
    }
}

async fn geocode(geocoder: &dyn Geocoder, address: &str) -> Result<Coordinate, ResolveError> {
    geocoder
        .resolve(address)
        .await?
        .ok_or_else(|| ResolveError::UnresolvedAddress(address.to_string()))
}

/// Ties matcher, cache, geocoder and ranker together.
#[derive(Clone)]
pub struct AssignmentPass {
    restaurants: RestaurantClient,
    orders: OrderClient,
    places: PlaceClient,
    geocoder: Arc<dyn Geocoder>,
}

impl AssignmentPass {
    pub fn new(
        restaurants: RestaurantClient,
        orders: OrderClient,
        places: PlaceClient,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            restaurants,
            orders,
            places,
            geocoder,
        }
    }

    /// Runs one pass and returns a record per active order, ordered by id.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<Vec<OrderAssignment>, AssignmentError> {
        let restaurants = self.restaurants.list().await?;
        let orders = self.orders.list_active_orders().await?;

        let addresses: BTreeSet<String> = restaurants
            .iter()
            .map(|r| r.address.clone())
            .chain(orders.iter().map(|o| o.address.clone()))
            .collect();
        let cached = self.places.get_many(addresses.into_iter().collect()).await?;
        debug!(cached = cached.len(), "Loaded cached coordinates");
        let mut places = PlaceMap::new(cached);

        let mut restaurant_coords = HashMap::new();
        for restaurant in &restaurants {
            match places
                .resolve(&restaurant.address, self.geocoder.as_ref(), &self.places)
                .await?
            {
                Some(coordinate) => {
                    restaurant_coords.insert(restaurant.id, coordinate);
                }
                None => {
                    warn!(restaurant = %restaurant.id, name = %restaurant.name, "Excluded from ranking");
                }
            }
        }

        let mut assignments = Vec::with_capacity(orders.len());
        for order in orders {
            let mut status = order.status;
            // Happens before ranking, whatever the address resolution yields.
            if matcher::requires_processing(&order) {
                self.orders.mark_processing(order.id).await?;
                status = OrderStatus::Processing;
                info!(order_id = %order.id, "Order moved to processing");
            }

            let candidates = matcher::candidates(&order, &restaurants);
            let ranked = match places
                .resolve(&order.address, self.geocoder.as_ref(), &self.places)
                .await?
            {
                Some(customer) => ranker::rank(customer, &candidates, &restaurant_coords),
                None => Vec::new(),
            };
            debug!(
                order_id = %order.id,
                candidates = candidates.len(),
                ranked = ranked.len(),
                "Order ranked"
            );

            assignments.push(OrderAssignment {
                order_id: order.id,
                status,
                total_price: order.total_price(),
                address: order.address,
                restaurant: order.restaurant,
                restaurants: ranked,
            });
        }

        info!(orders = assignments.len(), "Assignment pass finished");
        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::model::Place;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Geocoder answering from a fixed table and recording every call.
    struct TableGeocoder {
        table: HashMap<&'static str, Result<Option<Coordinate>, GeocodeError>>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Geocoder for TableGeocoder {
        async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
            self.calls.lock().unwrap().push(address.to_string());
            self.table.get(address).cloned().unwrap_or(Ok(None))
        }
    }

    fn geocoder(
        entries: Vec<(&'static str, Result<Option<Coordinate>, GeocodeError>)>,
    ) -> TableGeocoder {
        TableGeocoder {
            table: entries.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn at(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_hits_geocoder_once_per_failed_address() {
        let geocoder = geocoder(vec![(
            "broken",
            Err(GeocodeError::Transport("timeout".into())),
        )]);
        let mock = MockClient::<Place>::new();
        let cache = PlaceClient::new(mock.client());
        let mut places = PlaceMap::default();

        assert_eq!(places.resolve("broken", &geocoder, &cache).await.unwrap(), None);
        assert_eq!(places.resolve("broken", &geocoder, &cache).await.unwrap(), None);
        assert_eq!(places.resolve("unknown", &geocoder, &cache).await.unwrap(), None);
        assert_eq!(places.resolve("unknown", &geocoder, &cache).await.unwrap(), None);

        assert_eq!(*geocoder.calls.lock().unwrap(), vec!["broken", "unknown"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_resolve_writes_back_and_reuses_coordinate() {
        let home = at(55.7, 37.6);
        let geocoder = geocoder(vec![("home", Ok(Some(home)))]);
        let mut mock = MockClient::<Place>::new();
        mock.expect_upsert().return_ok(Place::new("home", Some(home)));
        let cache = PlaceClient::new(mock.client());
        let mut places = PlaceMap::default();

        assert_eq!(places.resolve("home", &geocoder, &cache).await.unwrap(), Some(home));
        assert_eq!(places.resolve("home", &geocoder, &cache).await.unwrap(), Some(home));

        assert_eq!(geocoder.calls.lock().unwrap().len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_resolve_skips_geocoder_for_cached_address() {
        let geocoder = geocoder(vec![]);
        let mock = MockClient::<Place>::new();
        let cache = PlaceClient::new(mock.client());
        let mut places = PlaceMap::new(HashMap::from([("home".to_string(), at(1.0, 2.0))]));

        assert_eq!(
            places.resolve("home", &geocoder, &cache).await.unwrap(),
            Some(at(1.0, 2.0))
        );
        assert!(geocoder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_fatal() {
        let geocoder = geocoder(vec![("home", Ok(Some(at(1.0, 2.0))))]);
        let mut mock = MockClient::<Place>::new();
        mock.expect_upsert()
            .return_err(crate::framework::FrameworkError::ActorClosed);
        let cache = PlaceClient::new(mock.client());
        let mut places = PlaceMap::default();

        let err = places.resolve("home", &geocoder, &cache).await.unwrap_err();
        assert!(matches!(err, PlaceError::ActorCommunicationError(_)));
    }
}
