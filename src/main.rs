use foodcart::config::AppConfig;
use foodcart::dashboard::{self, OrderBoard};
use foodcart::geocoder::YandexGeocoder;
use foodcart::lifecycle::{setup_tracing, FoodcartSystem};
use foodcart::model::{OrderCreate, OrderLine, ProductCreate, RestaurantCreate};
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting foodcart");

    let geocoder = YandexGeocoder::from_config(&config.geocoder).map_err(|e| e.to_string())?;
    let system = FoodcartSystem::new(config.actor_buffer, Arc::new(geocoder));

    let span = tracing::info_span!("seed");
    let (burger, fries) = async {
        let burger = system
            .product_client
            .create_product(ProductCreate::new("Чизбургер", 199.0))
            .await?;
        let fries = system
            .product_client
            .create_product(ProductCreate::new("Картофель фри", 89.0))
            .await?;
        Ok::<_, foodcart::product_actor::ProductError>((burger, fries))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    for (name, address, sells_fries) in [
        ("Star Burger Арбат", "Москва, улица Новый Арбат, 15", true),
        ("Star Burger Европейский", "Москва, площадь Киевского Вокзала, 2", true),
        ("Star Burger Ленинский", "Москва, Ленинский проспект, 26", false),
    ] {
        let restaurant = RestaurantCreate::new(name, address)
            .with_menu_item(burger, true)
            .with_menu_item(fries, sells_fries);
        system
            .restaurant_client
            .create_restaurant(restaurant)
            .await
            .map_err(|e| e.to_string())?;
    }

    let order_id = system
        .order_client
        .register_order(OrderCreate {
            firstname: "Иван".into(),
            lastname: "Петров".into(),
            phonenumber: "+79291000000".into(),
            address: "Москва, Тверская улица, 7".into(),
            products: vec![
                OrderLine { product: burger, quantity: 2 },
                OrderLine { product: fries, quantity: 1 },
            ],
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(%order_id, "Order registered");

    let assignments = system
        .run_assignment_pass()
        .instrument(tracing::info_span!("assignment"))
        .await
        .map_err(|e| e.to_string())?;
    let board = dashboard::to_json(&OrderBoard { orders: &assignments }).map_err(|e| e.to_string())?;
    println!("{board}");

    let matrix =
        dashboard::load_availability_matrix(&system.product_client, &system.restaurant_client)
            .await
            .map_err(|e| e.to_string())?;
    println!("{}", dashboard::to_json(&matrix).map_err(|e| e.to_string())?);

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
