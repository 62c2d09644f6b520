//! Generic actor framework for resource management.
//!
//! This module provides the core building blocks for the type-safe actors
//! that own every resource of the backend (products, restaurants, orders and
//! cached places).
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that manages entities
//! - [`ResourceClient`] - Typed, cloneable handle used to talk to an actor
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

pub use core::*;
