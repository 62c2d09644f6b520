use crate::assignment::{AssignmentError, AssignmentPass, OrderAssignment};
use crate::clients::{OrderClient, PlaceClient, ProductClient, RestaurantClient};
use crate::geocoder::Geocoder;
use std::sync::Arc;
use tracing::{error, info};

/// The runtime that owns every resource actor of the backend.
///
/// `FoodcartSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping all actors
/// - **Dependency Wiring**: The Order actor gets a [`ProductClient`] as its
///   context so it can price new orders
/// - **Assignment**: Building an [`AssignmentPass`] over the running actors
///   and the injected [`Geocoder`]
///
/// # Example
///
/// ```ignore
/// let system = FoodcartSystem::new(32, Arc::new(geocoder));
///
/// let burger = system.product_client.create_product(ProductCreate::new("Burger", 250.0)).await?;
/// let order_id = system.order_client.register_order(order).await?;
/// let dashboard = system.run_assignment_pass().await?;
///
/// system.shutdown().await?;
/// ```
pub struct FoodcartSystem {
    pub product_client: ProductClient,
    pub restaurant_client: RestaurantClient,
    pub order_client: OrderClient,
    /// The coordinate cache.
    pub place_client: PlaceClient,

    geocoder: Arc<dyn Geocoder>,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl FoodcartSystem {
    /// Spawns the four resource actors, each with a channel of `buffer_size`.
    pub fn new(buffer_size: usize, geocoder: Arc<dyn Geocoder>) -> Self {
        let (product_actor, product_client) = crate::product_actor::new(buffer_size);
        let (restaurant_actor, restaurant_client) = crate::restaurant_actor::new(buffer_size);
        let (order_actor, order_client) = crate::order_actor::new(buffer_size);
        let (place_actor, place_client) = crate::place_actor::new(buffer_size);

        let product_handle = tokio::spawn(product_actor.run(()));
        let restaurant_handle = tokio::spawn(restaurant_actor.run(()));
        let place_handle = tokio::spawn(place_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(product_client.clone()));

        info!(buffer_size, "Foodcart system started");
        Self {
            product_client,
            restaurant_client,
            order_client,
            place_client,
            geocoder,
            handles: vec![product_handle, restaurant_handle, place_handle, order_handle],
        }
    }

    pub fn assignment_pass(&self) -> AssignmentPass {
        AssignmentPass::new(
            self.restaurant_client.clone(),
            self.order_client.clone(),
            self.place_client.clone(),
            self.geocoder.clone(),
        )
    }

    /// Runs one assignment pass over the active orders.
    pub async fn run_assignment_pass(&self) -> Result<Vec<OrderAssignment>, AssignmentError> {
        self.assignment_pass().run().await
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the channels; each actor drains and exits
    /// its loop. Clones handed out earlier must be dropped first or the
    /// corresponding actor keeps running.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.restaurant_client);
        drop(self.place_client);
        // The Order actor holds a ProductClient, so products close last.
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
