//! Pure data structures implementing the [`ActorEntity`](crate::framework::ActorEntity) trait.

pub mod coordinate;
pub mod order;
pub mod place;
pub mod product;
pub mod restaurant;

pub use coordinate::*;
pub use order::*;
pub use place::*;
pub use product::*;
pub use restaurant::*;
