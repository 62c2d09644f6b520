use async_trait::async_trait;
use foodcart::assignment::OrderAssignment;
use foodcart::catalog;
use foodcart::clients::ActorClient;
use foodcart::geocoder::{GeocodeError, Geocoder};
use foodcart::lifecycle::FoodcartSystem;
use foodcart::model::{
    Coordinate, OrderCreate, OrderId, OrderLine, OrderStatus, ProductCreate, ProductId,
    RestaurantCreate, RestaurantId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Geocoder backed by a fixed table. Addresses listed as failing return a
/// transport error; unknown addresses resolve to nothing.
struct FakeGeocoder {
    table: HashMap<&'static str, Coordinate>,
    failing: Vec<&'static str>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    fn new(table: &[(&'static str, f64, f64)], failing: &[&'static str]) -> Self {
        Self {
            table: table
                .iter()
                .map(|&(address, lat, lon)| (address, Coordinate::new(lat, lon).unwrap()))
                .collect(),
            failing: failing.to_vec(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(address.to_string());
        if self.failing.iter().any(|failing| *failing == address) {
            return Err(GeocodeError::Transport("connection reset".into()));
        }
        Ok(self.table.get(address).copied())
    }
}

fn customer(address: &str, lines: &[(ProductId, u32)]) -> OrderCreate {
    OrderCreate {
        firstname: "Anna".into(),
        lastname: "Smirnova".into(),
        phonenumber: "+79000000000".into(),
        address: address.into(),
        products: lines
            .iter()
            .map(|&(product, quantity)| OrderLine { product, quantity })
            .collect(),
    }
}

struct Fixture {
    system: FoodcartSystem,
    geocoder: Arc<FakeGeocoder>,
    burger: ProductId,
    fries: ProductId,
    restaurants: Vec<RestaurantId>,
    orders: Vec<OrderId>,
}

/// Four restaurants on the equator east of the customer, one of them with
/// an address the geocoder cannot reach.
async fn fixture() -> Fixture {
    let geocoder = Arc::new(FakeGeocoder::new(
        &[
            ("Addr Near", 0.0, 0.1),
            ("Addr Far", 0.0, 1.0),
            ("Addr Burgers", 0.0, 0.05),
            ("Home", 0.0, 0.0),
        ],
        &["Addr Broken"],
    ));
    let system = FoodcartSystem::new(8, geocoder.clone());

    let burger = system
        .product_client
        .create_product(ProductCreate::new("Burger", 100.0))
        .await
        .unwrap();
    let fries = system
        .product_client
        .create_product(ProductCreate::new("Fries", 50.0))
        .await
        .unwrap();

    let mut restaurants = Vec::new();
    for (name, address, sells_fries) in [
        ("Near", "Addr Near", true),
        ("Far", "Addr Far", true),
        ("Burgers Only", "Addr Burgers", false),
        ("Broken", "Addr Broken", true),
    ] {
        let mut create = RestaurantCreate::new(name, address).with_menu_item(burger, true);
        if sells_fries {
            create = create.with_menu_item(fries, true);
        }
        restaurants.push(system.restaurant_client.create_restaurant(create).await.unwrap());
    }

    let orders = vec![
        // Needs both products.
        system
            .order_client
            .register_order(customer("Home", &[(burger, 1), (fries, 2)]))
            .await
            .unwrap(),
        // Assigned to Far.
        system
            .order_client
            .register_order(customer("Home", &[(burger, 1)]))
            .await
            .unwrap(),
        // Assigned to Near, but the address does not geocode.
        system
            .order_client
            .register_order(customer("Nowhere", &[(burger, 1)]))
            .await
            .unwrap(),
        // Cancelled before the pass.
        system
            .order_client
            .register_order(customer("Home", &[(fries, 1)]))
            .await
            .unwrap(),
    ];
    system
        .order_client
        .assign_restaurant(orders[1], restaurants[1])
        .await
        .unwrap();
    system
        .order_client
        .assign_restaurant(orders[2], restaurants[0])
        .await
        .unwrap();
    system
        .order_client
        .advance(orders[3], OrderStatus::Cancelled)
        .await
        .unwrap();

    Fixture {
        system,
        geocoder,
        burger,
        fries,
        restaurants,
        orders,
    }
}

fn ranked_names(assignment: &OrderAssignment) -> Vec<&str> {
    assignment
        .restaurants
        .iter()
        .map(|r| r.name.as_str())
        .collect()
}

/// Full end-to-end pass with all real actors.
#[tokio::test]
async fn test_assignment_pass_end_to_end() {
    let f = fixture().await;

    let board = f.system.run_assignment_pass().await.unwrap();

    // The cancelled order is not on the worklist.
    let ids: Vec<OrderId> = board.iter().map(|a| a.order_id).collect();
    assert_eq!(ids, f.orders[..3].to_vec());

    // Full coverage required: "Burgers Only" has no fries, "Broken" has no
    // coordinate. Nearest first.
    assert_eq!(ranked_names(&board[0]), vec!["Near", "Far"]);
    assert_eq!(board[0].restaurants[0].distance_km, 11.13);
    assert_eq!(board[0].restaurants[1].distance_km, 111.32);
    assert_eq!(board[0].total_price, 200.0);
    assert_eq!(board[0].status, OrderStatus::Unprocessed);

    // An assigned order is only offered its restaurant and moves to processing.
    assert_eq!(ranked_names(&board[1]), vec!["Far"]);
    assert_eq!(board[1].status, OrderStatus::Processing);

    // The transition happens even when the address cannot be resolved.
    assert!(board[2].restaurants.is_empty());
    assert_eq!(board[2].status, OrderStatus::Processing);

    for id in &f.orders[1..3] {
        let stored = f.system.order_client.get(*id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Processing);
    }
    let untouched = f.system.order_client.get(f.orders[0]).await.unwrap().unwrap();
    assert_eq!(untouched.status, OrderStatus::Unprocessed);

    // One geocoder call per distinct address.
    let mut seen = f.geocoder.seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec!["Addr Broken", "Addr Burgers", "Addr Far", "Addr Near", "Home", "Nowhere"]
    );

    f.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_second_pass_is_idempotent() {
    let f = fixture().await;

    let first = f.system.run_assignment_pass().await.unwrap();
    let calls_after_first = f.geocoder.calls();
    let places_after_first = f.system.place_client.list_places().await.unwrap();

    let second = f.system.run_assignment_pass().await.unwrap();

    assert_eq!(first, second);
    // Only the two addresses that failed are retried.
    assert_eq!(f.geocoder.calls(), calls_after_first + 2);

    let places = f.system.place_client.list_places().await.unwrap();
    assert_eq!(places.len(), 4);
    assert_eq!(places, places_after_first);

    f.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_menu_changes_apply_to_next_pass() {
    let f = fixture().await;
    f.system.run_assignment_pass().await.unwrap();

    let item = f
        .system
        .restaurant_client
        .set_availability(f.restaurants[0], f.fries, false)
        .await
        .unwrap();
    assert!(!item.availability);

    let board = f.system.run_assignment_pass().await.unwrap();
    assert_eq!(ranked_names(&board[0]), vec!["Far"]);

    let restaurant = f
        .system
        .restaurant_client
        .get(f.restaurants[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restaurant.menu.len(), 2);
    assert!(restaurant.is_available(f.burger));

    f.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_coordinate_cache_round_trip() {
    let system = FoodcartSystem::new(8, Arc::new(FakeGeocoder::new(&[], &[])));
    let cache = &system.place_client;

    assert_eq!(cache.get("Arbat 10").await.unwrap(), None);

    let first = Coordinate::new(55.752_119_4, 37.591_798_7).unwrap();
    let created = cache.put("Arbat 10", first).await.unwrap();
    assert_eq!(cache.get("Arbat 10").await.unwrap(), Some(first));
    assert_eq!(first.latitude(), 55.752119);
    assert_eq!(first.longitude(), 37.591799);

    let second = Coordinate::new(55.7522, 37.5918).unwrap();
    let refreshed = cache.put("Arbat 10", second).await.unwrap();
    assert_eq!(refreshed.coordinate, Some(second));
    assert_eq!(refreshed.created_at, created.created_at);

    // Exact-string keys: no normalization.
    assert_eq!(cache.get("arbat 10").await.unwrap(), None);
    assert_eq!(cache.list_places().await.unwrap().len(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_catalog_lists_products_on_sale() {
    let system = FoodcartSystem::new(8, Arc::new(FakeGeocoder::new(&[], &[])));
    let burger = system
        .product_client
        .create_product(ProductCreate::new("Burger", 100.0))
        .await
        .unwrap();
    let shake = system
        .product_client
        .create_product(ProductCreate::new("Shake", 120.0))
        .await
        .unwrap();
    system
        .restaurant_client
        .create_restaurant(
            RestaurantCreate::new("Near", "Addr Near")
                .with_menu_item(burger, true)
                .with_menu_item(shake, false),
        )
        .await
        .unwrap();

    let products =
        catalog::available_products(&system.product_client, &system.restaurant_client)
            .await
            .unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Burger"]);

    system.shutdown().await.unwrap();
}
