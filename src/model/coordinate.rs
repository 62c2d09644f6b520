//! The canonical geographic coordinate.
//!
//! Every component (cache, gateway, ranker) exchanges positions as a
//! [`Coordinate`]; the field names fix the latitude/longitude order so no
//! call site can swap them. Geocoder wire formats that put longitude first
//! convert through [`Coordinate::from_lon_lat`] at the gateway edge.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Number of fractional digits kept for each axis.
pub const COORDINATE_PRECISION: i32 = 6;

/// Errors raised when building a [`Coordinate`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude out of range: {0}")]
    Latitude(f64),

    #[error("longitude out of range: {0}")]
    Longitude(f64),
}

/// A WGS-84 position in decimal degrees, rounded to six fractional digits.
///
/// Deserialization goes through [`Coordinate::new`], so decoded values are
/// range-checked and rounded too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

fn quantize(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    (value * scale).round() / scale
}

impl Coordinate {
    /// Validates the ranges and rounds both axes to six decimals.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude: quantize(latitude),
            longitude: quantize(longitude),
        })
    }

    /// Builds a coordinate from a longitude-first pair.
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Result<Self, CoordinateError> {
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
