//! Public product catalog.

use crate::clients::{ActorClient, ProductClient, RestaurantClient};
use crate::model::{Product, ProductId, Restaurant};
use crate::product_actor::ProductError;
use crate::restaurant_actor::RestaurantError;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error(transparent)]
    Products(#[from] ProductError),

    #[error(transparent)]
    Restaurants(#[from] RestaurantError),
}

/// Products available in at least one restaurant, ordered by id.
pub fn available_in(products: Vec<Product>, restaurants: &[Restaurant]) -> Vec<Product> {
    let on_sale: BTreeSet<ProductId> = restaurants
        .iter()
        .flat_map(|r| r.menu.values())
        .filter(|item| item.availability)
        .map(|item| item.product)
        .collect();
    products
        .into_iter()
        .filter(|product| on_sale.contains(&product.id))
        .collect()
}

/// Loads the catalog shown to customers.
#[instrument(skip_all)]
pub async fn available_products(
    products: &ProductClient,
    restaurants: &RestaurantClient,
) -> Result<Vec<Product>, CatalogError> {
    let all = products.list().await?;
    let restaurants = restaurants.list().await?;
    Ok(available_in(all, &restaurants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RestaurantId;

    #[test]
    fn test_hides_products_nobody_sells() {
        let products = vec![
            Product::new(ProductId(1), "Burger", 250.0),
            Product::new(ProductId(2), "Fries", 90.0),
            Product::new(ProductId(3), "Shake", 150.0),
        ];
        let restaurants = vec![
            Restaurant::new(RestaurantId(1), "A", "a")
                .with_menu_item(ProductId(1), true)
                .with_menu_item(ProductId(2), false),
            Restaurant::new(RestaurantId(2), "B", "b").with_menu_item(ProductId(3), true),
        ];

        let names: Vec<String> = available_in(products, &restaurants)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Burger", "Shake"]);
    }
}
