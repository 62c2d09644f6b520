//! # Foodcart
//!
//! Backend of a food-ordering service: product catalog, order registration
//! and a manager dashboard that assigns orders to restaurants by menu
//! availability and distance to the customer.
//!
//! ## Architecture Notes
//!
//! ### 1. Resource actors
//! Products, restaurants, orders and cached places each live in a
//! [`ResourceActor`](framework::ResourceActor) running in its own Tokio task.
//! Actors process requests one at a time, so entity state needs no locks and
//! upserts into the coordinate cache are atomic.
//!
//! ### 2. Type-safe error handling
//! Each actor defines its own error type (`ProductError`, `OrderError`, ...).
//! Clients recover it from the framework's boxed entity error, so callers
//! can match on e.g. [`OrderError::InvalidTransition`](order_actor::OrderError::InvalidTransition).
//!
//! ### 3. Context injection
//! Dependencies are injected when an actor is started: the Order actor runs
//! with a [`ProductClient`](clients::ProductClient) to price new orders.
//!
//! ### 4. Observability
//! `tracing` everywhere, installed by [`lifecycle::setup_tracing`].
//!
//! ## Module Tour
//!
//! - [`framework`]: the generic actor, client, errors and test mocks.
//! - [`model`]: plain data ([`Coordinate`](model::Coordinate), products, restaurants, orders, places).
//! - [`product_actor`], [`restaurant_actor`], [`order_actor`], [`place_actor`]:
//!   [`ActorEntity`](framework::ActorEntity) implementations.
//! - [`clients`]: domain clients; [`PlaceClient`](clients::PlaceClient) is the coordinate cache.
//! - [`geocoder`]: the geocoding gateway.
//! - [`assignment`]: matcher, distance ranker and the assignment pass.
//! - [`catalog`], [`dashboard`]: read models for customers and managers.
//! - [`config`], [`lifecycle`]: environment configuration and system wiring.
//!
//! ## Running the Demo
//!
//! ```bash
//! YANDEX_GEOCODER_API_KEY=... RUST_LOG=info cargo run
//! ```

pub mod assignment;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod dashboard;
pub mod framework;
pub mod geocoder;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod place_actor;
pub mod product_actor;
pub mod restaurant_actor;
