//! Manager dashboard views.
//!
//! Everything here is plain data with `Serialize`, rendered as JSON by
//! [`to_json`].

use crate::assignment::OrderAssignment;
use crate::clients::{ActorClient, ProductClient, RestaurantClient};
use crate::catalog::CatalogError;
use crate::model::{Product, ProductId, Restaurant, RestaurantId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantColumn {
    pub id: RestaurantId,
    pub name: String,
}

/// Availability of one product across every restaurant column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product: ProductId,
    pub name: String,
    pub availability: Vec<bool>,
}

/// Restaurant × product availability table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityMatrix {
    /// Ordered by restaurant name.
    pub restaurants: Vec<RestaurantColumn>,
    pub products: Vec<ProductRow>,
}

/// Builds the table. A product missing from a menu reads as unavailable.
pub fn availability_matrix(restaurants: &[Restaurant], products: &[Product]) -> AvailabilityMatrix {
    let mut columns: Vec<&Restaurant> = restaurants.iter().collect();
    columns.sort_by(|a, b| a.name.cmp(&b.name));

    let products = products
        .iter()
        .map(|product| ProductRow {
            product: product.id,
            name: product.name.clone(),
            availability: columns.iter().map(|r| r.is_available(product.id)).collect(),
        })
        .collect();

    AvailabilityMatrix {
        restaurants: columns
            .into_iter()
            .map(|r| RestaurantColumn {
                id: r.id,
                name: r.name.clone(),
            })
            .collect(),
        products,
    }
}

pub async fn load_availability_matrix(
    products: &ProductClient,
    restaurants: &RestaurantClient,
) -> Result<AvailabilityMatrix, CatalogError> {
    let products = products.list().await?;
    let restaurants = restaurants.list().await?;
    Ok(availability_matrix(&restaurants, &products))
}

/// Order worklist as shown to managers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBoard<'a> {
    pub orders: &'a [OrderAssignment],
}

pub fn to_json<T: Serialize>(view: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}
