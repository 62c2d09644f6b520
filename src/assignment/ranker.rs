//! Geodesic distance ranking.
//!
//! Distances are measured on the WGS-84 ellipsoid with Vincenty's inverse
//! formula. Nearly antipodal points where the iteration does not converge
//! fall back to the great-circle distance on the mean-radius sphere.

use crate::model::{Coordinate, Restaurant, RestaurantId};
use serde::Serialize;
use std::collections::HashMap;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// One entry of a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    pub restaurant: RestaurantId,
    pub name: String,
    pub distance_km: f64,
}

/// Orders `candidates` by distance from `customer`, nearest first.
///
/// Candidates missing from `restaurant_coords` are left out. Equal distances
/// keep their input order.
pub fn rank(
    customer: Coordinate,
    candidates: &[&Restaurant],
    restaurant_coords: &HashMap<RestaurantId, Coordinate>,
) -> Vec<RankedRestaurant> {
    let mut ranked: Vec<RankedRestaurant> = candidates
        .iter()
        .filter_map(|restaurant| {
            let position = restaurant_coords.get(&restaurant.id)?;
            Some(RankedRestaurant {
                restaurant: restaurant.id,
                name: restaurant.name.clone(),
                distance_km: round_km(distance_km(customer, *position)),
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Geodesic distance between two points in kilometres.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    vincenty_km(from, to).unwrap_or_else(|| haversine_km(from, to))
}

fn vincenty_km(from: Coordinate, to: Coordinate) -> Option<f64> {
    let l = (to.longitude() - from.longitude()).to_radians();
    let u1 = ((1.0 - WGS84_F) * from.latitude().to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * to.latitude().to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // Coincident points.
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial line: cos_sq_alpha is zero.
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < CONVERGENCE {
            let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
            let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = b
                * sin_sigma
                * (cos_2sigma_m
                    + b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            let metres = WGS84_B * a * (sigma - delta_sigma);
            return Some(metres / 1000.0);
        }
    }
    None
}

fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude() - from.latitude()).to_radians();
    let d_lon = (to.longitude() - from.longitude()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + from.latitude().to_radians().cos()
            * to.latitude().to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().asin()
}
