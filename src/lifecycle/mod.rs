//! Runtime orchestration and lifecycle management.
//!
//! - [`FoodcartSystem`] starts the resource actors, wires their
//!   dependencies and shuts them down.
//! - [`setup_tracing`] installs the log subscriber.

pub mod foodcart_system;
pub mod tracing;

pub use foodcart_system::*;
pub use tracing::*;
