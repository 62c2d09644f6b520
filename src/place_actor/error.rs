//! Error types for the Place actor (the coordinate cache).

use thiserror::Error;

/// Errors that can occur while reading or writing cached places.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlaceError {
    /// The address key is empty.
    #[error("Place validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PlaceError {
    fn from(msg: String) -> Self {
        PlaceError::ActorCommunicationError(msg)
    }
}
