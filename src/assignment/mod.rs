//! # Order Assignment
//!
//! Decides which restaurants can cook each active order and ranks them by
//! distance to the customer.
//!
//! - [`matcher`]: menu-availability filtering (pure).
//! - [`ranker`]: geodesic distances and ordering (pure).
//! - [`orchestrator`]: one [`AssignmentPass`] over the active worklist,
//!   resolving coordinates through the cache and the geocoder.

pub mod matcher;
pub mod orchestrator;
pub mod ranker;

pub use orchestrator::{AssignmentError, AssignmentPass, OrderAssignment, PlaceMap, ResolveError};
pub use ranker::RankedRestaurant;
