//! Error types for the Product actor.

use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The product payload is invalid (empty name, negative price).
    #[error("Product validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ProductError {
    fn from(msg: String) -> Self {
        ProductError::ActorCommunicationError(msg)
    }
}
