//! Error types for the Order actor.

use crate::model::OrderStatus;
use crate::product_actor::ProductError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The product specified in the order is invalid or does not exist.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// The requested status change would move the order backwards.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The product catalog could not be consulted.
    #[error(transparent)]
    Catalog(#[from] ProductError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
