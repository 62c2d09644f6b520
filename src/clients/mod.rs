//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod actor_client;
pub mod order_client;
pub mod place_client;
pub mod product_client;
pub mod restaurant_client;

pub use actor_client::*;
pub use order_client::*;
pub use place_client::*;
pub use product_client::*;
pub use restaurant_client::*;
