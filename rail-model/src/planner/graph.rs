//! Query graph over a frozen network.
//!
//! Nodes are "riding route R at station S" plus, per station, an origin node
//! (where a journey starts, before boarding anything) and an arrival node
//! (where a journey ends). The graph is materialized once per resolver and
//! shared by every query.
//!
//! Board edges leave origin nodes only, so the first wait is charged exactly
//! once, and arrival nodes have no outgoing edges: the only ways from one
//! route to another are a registered change or a declared continuation.
//!
//! With [`ResolverConfig::ride_before_change`] set, a board edge also covers
//! the first segment and lands one station along the route. No riding node is
//! then reachable at the start station itself, so no change can follow a
//! boarding directly. Every node's outgoing edges are the same however it was
//! reached, which the resolver's tie handling depends on.

use std::collections::HashMap;

use chrono::Duration;

use crate::domain::{ChangeId, Route, RouteId, StationCode, minutes};
use crate::network::Network;

use super::config::ResolverConfig;

/// What a graph node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// At a station before boarding anything
    Origin(StationCode),
    /// On a route (by registration index) at a position along it
    Riding { route: usize, position: usize },
    /// At a station having left the train
    Arrived(StationCode),
}

/// What a graph edge stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Waiting for and boarding the first train, plus its first segment
    /// when rides must precede changes
    Board,
    /// Riding to the next station on the same route
    Ride,
    /// Interchanging between routes
    Change(ChangeId),
    /// Crossing into a continuation route
    Chain,
    /// Leaving the train
    Alight,
}

/// A weighted, directed edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub to: usize,
    pub cost: Duration,
    pub kind: EdgeKind,
}

/// Adjacency index over a network.
#[derive(Debug)]
pub struct QueryGraph {
    nodes: Vec<Node>,
    edges: Vec<Vec<Edge>>,
    /// First riding node of each route; positions follow consecutively.
    route_base: Vec<usize>,
    /// Station -> (origin node, arrival node).
    terminals: HashMap<StationCode, (usize, usize)>,
}

impl QueryGraph {
    /// Build the graph for a network.
    ///
    /// Riding nodes come first, in route registration order, then the
    /// origin/arrival pair of each station in registry order. Edge lists are
    /// filled in registration order, which keeps searches deterministic.
    pub fn build(network: &Network, config: &ResolverConfig) -> Self {
        let mut nodes = Vec::new();
        let mut route_base = Vec::with_capacity(network.routes().len());

        for (route_idx, route) in network.routes().iter().enumerate() {
            route_base.push(nodes.len());
            for position in 0..route.stations().len() {
                nodes.push(Node::Riding {
                    route: route_idx,
                    position,
                });
            }
        }

        let mut terminals = HashMap::with_capacity(network.stations().len());
        for station in network.stations().iter() {
            let origin = nodes.len();
            nodes.push(Node::Origin(station.code));
            nodes.push(Node::Arrived(station.code));
            terminals.insert(station.code, (origin, origin + 1));
        }

        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); nodes.len()];

        for (route_idx, route) in network.routes().iter().enumerate() {
            let base = route_base[route_idx];
            let wait = board_wait(route, config);
            let last = route.stations().len() - 1;

            for (position, station) in route.stations().iter().enumerate() {
                let node = base + position;
                let Some(&(origin, arrival)) = terminals.get(station) else {
                    continue;
                };

                if position < last {
                    let segment = minutes(route.segment_times()[position]);
                    edges[origin].push(if config.ride_before_change {
                        Edge {
                            to: node + 1,
                            cost: wait + segment,
                            kind: EdgeKind::Board,
                        }
                    } else {
                        Edge {
                            to: node,
                            cost: wait,
                            kind: EdgeKind::Board,
                        }
                    });
                    edges[node].push(Edge {
                        to: node + 1,
                        cost: segment,
                        kind: EdgeKind::Ride,
                    });
                }
                if position > 0 {
                    edges[node].push(Edge {
                        to: arrival,
                        cost: Duration::zero(),
                        kind: EdgeKind::Alight,
                    });
                }
            }

            if let Some(next_idx) = route
                .continuation()
                .and_then(|next| network.route_index(next))
            {
                edges[base + last].push(Edge {
                    to: route_base[next_idx],
                    cost: Duration::zero(),
                    kind: EdgeKind::Chain,
                });
            }
        }

        for (id, change) in network.changes() {
            let riding_at = |route_id: &RouteId| {
                let idx = network.route_index(route_id)?;
                let position = network.routes()[idx].position(change.station())?;
                Some(route_base[idx] + position)
            };
            if let (Some(from), Some(to)) = (riding_at(change.from()), riding_at(change.to())) {
                edges[from].push(Edge {
                    to,
                    cost: change.estimate(config.interchange),
                    kind: EdgeKind::Change(id),
                });
            }
        }

        Self {
            nodes,
            edges,
            route_base,
            terminals,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// What a node stands for.
    pub fn node(&self, idx: usize) -> Node {
        self.nodes[idx]
    }

    /// Outgoing edges of a node.
    pub fn edges(&self, idx: usize) -> &[Edge] {
        &self.edges[idx]
    }

    /// Origin node of a station.
    pub fn origin(&self, station: &StationCode) -> Option<usize> {
        self.terminals.get(station).map(|&(origin, _)| origin)
    }

    /// Arrival node of a station.
    pub fn arrival(&self, station: &StationCode) -> Option<usize> {
        self.terminals.get(station).map(|&(_, arrival)| arrival)
    }

    /// Riding node for a route index and position.
    pub fn riding(&self, route: usize, position: usize) -> usize {
        self.route_base[route] + position
    }
}

/// Wait charged on a board edge onto `route`.
pub fn board_wait(route: &Route, config: &ResolverConfig) -> Duration {
    if config.first_wait {
        route.expected_wait()
    } else {
        Duration::zero()
    }
}
