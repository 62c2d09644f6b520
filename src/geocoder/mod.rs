//! # Geocoding Gateway
//!
//! Resolves a postal address to a [`Coordinate`]. The assignment pass only
//! sees the [`Geocoder`] trait; [`YandexGeocoder`] is the HTTP implementation
//! and tests inject fakes.

pub mod yandex;

pub use yandex::YandexGeocoder;

use crate::model::Coordinate;
use async_trait::async_trait;
use thiserror::Error;

/// Failure to talk to the geocoding service.
///
/// An address the service does not know is not an error; it resolves to
/// `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeocodeError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("geocoder request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("geocoder returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be understood.
    #[error("invalid geocoder payload: {0}")]
    Payload(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `address` to the most relevant match, if any.
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}
