//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter
//! filtered by `RUST_LOG`. The crate/module prefix is hidden
//! (`with_target(false)`); actors log an `entity_type` field instead.
//!
//! ## Usage
//!
//! ```bash
//! # Actor lifecycle, created entities, pass summary
//! RUST_LOG=info cargo run
//!
//! # Every request with its payload, cache hits, ranking sizes
//! RUST_LOG=debug cargo run
//!
//! # Only the assignment engine
//! RUST_LOG=foodcart::assignment=debug cargo run
//! ```
//!
//! ## What Gets Logged
//!
//! - **Actor Lifecycle**: `Actor started`, `Shutdown` with the final store size
//! - **Entity Operations**: `Created`, `Updated`, `Refreshed` (upsert hit), `Action ok`
//! - **Assignment**: unresolved addresses at `warn`, with the address and
//!   the geocoder error; restaurants excluded from ranking; orders moved to
//!   processing
//!
//! A pass over one order with a broken restaurant address reads:
//!
//! ```text
//! INFO  Actor started entity_type="Place"
//! WARN  run: Coordinate unresolved address="Nowhere 0" error=no geocoder match for "Nowhere 0"
//! WARN  run: Excluded from ranking restaurant=restaurant_2 name=Lost
//! INFO  run: Order moved to processing order_id=order_1
//! INFO  run: Assignment pass finished orders=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type replaces module paths
        .compact()
        .init();
}
