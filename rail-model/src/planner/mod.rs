//! Minimum-time journey resolution.
//!
//! A [`Resolver`] turns a frozen [`Network`](crate::network::Network) into a
//! [`QueryGraph`] once, then answers "what is the quickest way from A to B"
//! with a Dijkstra search per query. Equally quick journeys are separated by
//! [`compare_tied`].

mod config;
mod graph;
mod rank;
mod resolve;

pub use config::ResolverConfig;
pub use graph::{Edge, EdgeKind, Node, QueryGraph};
pub use rank::compare_tied;
pub use resolve::Resolver;
