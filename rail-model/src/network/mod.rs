//! The network model.
//!
//! Building is two-phase: a [`NetworkBuilder`] accepts registrations and
//! validates them, and [`NetworkBuilder::build`] consumes it to produce an
//! immutable [`Network`] that only answers queries.

mod builder;
mod model;

pub use builder::NetworkBuilder;
pub use model::Network;
