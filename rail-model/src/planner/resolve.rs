//! Minimum-time path resolution.
//!
//! Dijkstra over the [`QueryGraph`] from the start station's origin node to
//! the end station's arrival node. All edge weights are non-negative, so the
//! first time the arrival node is settled its distance is minimal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use chrono::Duration;
use tracing::debug;

use crate::domain::{ChangeId, Journey, Leg, QueryError, Route, RouteId, Station, StationCode};
use crate::network::Network;

use super::config::ResolverConfig;
use super::graph::{Edge, EdgeKind, Node, QueryGraph, board_wait};
use super::rank::compare_tied;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: Duration,
    node: usize,
}

// Flip both comparisons so the heap pops the cheapest state first, then the
// lowest node index.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How a node was reached: previous node and the edge taken from it.
type Pred = Option<(usize, Edge)>;

/// Computes minimum-time journeys over a frozen network.
///
/// The query graph is built once in [`Resolver::new`]; each query only reads
/// it, so one resolver can serve many queries, including from several
/// threads at once.
pub struct Resolver<'a> {
    network: &'a Network,
    graph: QueryGraph,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with the default configuration.
    pub fn new(network: &'a Network) -> Self {
        Self::with_config(network, ResolverConfig::default())
    }

    /// Create a resolver with the given configuration.
    pub fn with_config(network: &'a Network, config: ResolverConfig) -> Self {
        let graph = QueryGraph::build(network, &config);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Query graph built"
        );
        Self {
            network,
            graph,
            config,
        }
    }

    pub fn network(&self) -> &Network {
        self.network
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Find the quickest journey from `start` to `end`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::InvalidQuery`] if either station is unknown
    /// - [`QueryError::NoPath`] if the stations are not connected
    pub fn resolve(&self, start: StationCode, end: StationCode) -> Result<Journey, QueryError> {
        let from = self.station(start)?;
        let to = self.station(end)?;

        if start == end {
            return Ok(Journey::trivial(from.clone()));
        }

        let (Some(source), Some(target)) = (self.graph.origin(&start), self.graph.arrival(&end)) else {
            return Err(QueryError::NoPath {
                from: start,
                to: end,
            });
        };

        let pred = self.search(source, target, start, end)?;
        let path = self.walk_back(&pred, target);
        let legs = self.legs(&path);

        Ok(Journey::new(from.clone(), to.clone(), legs))
    }

    /// Explain the quickest journey as text.
    pub fn explain(&self, start: StationCode, end: StationCode) -> Result<String, QueryError> {
        self.resolve(start, end).map(|journey| journey.to_string())
    }

    /// Total time of the quickest journey.
    pub fn total_time(&self, start: StationCode, end: StationCode) -> Result<Duration, QueryError> {
        self.resolve(start, end).map(|journey| journey.total())
    }

    fn station(&self, code: StationCode) -> Result<&Station, QueryError> {
        self.network
            .station(&code)
            .ok_or_else(|| QueryError::InvalidQuery(format!("unknown station {code}")))
    }

    /// Run the search, returning the predecessor table.
    ///
    /// A plain Dijkstra pass first settles every node no further from the
    /// source than the target. The tight edges (those on some quickest path)
    /// are then replayed in order of distance and, within one distance, of
    /// zero-cost hops from the nearest node entered by a timed edge. Every
    /// equally quick way into a node is therefore weighed by
    /// [`compare_tied`] before that node passes its path on, whatever the
    /// node numbering.
    fn search(
        &self,
        source: usize,
        target: usize,
        start: StationCode,
        end: StationCode,
    ) -> Result<Vec<Pred>, QueryError> {
        let n = self.graph.node_count();
        let mut dist: Vec<Option<Duration>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut order = Vec::new();
        let mut heap = BinaryHeap::new();
        let mut total = None;

        dist[source] = Some(Duration::zero());
        heap.push(State {
            cost: Duration::zero(),
            node: source,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if total.is_some_and(|total| cost > total) {
                break;
            }
            if settled[node] {
                continue;
            }
            settled[node] = true;
            order.push(node);
            if node == target {
                total = Some(cost);
            }

            for edge in self.graph.edges(node) {
                let next = cost + edge.cost;
                if dist[edge.to].is_none_or(|best| next < best) {
                    dist[edge.to] = Some(next);
                    heap.push(State {
                        cost: next,
                        node: edge.to,
                    });
                }
            }
        }

        let Some(total) = total else {
            debug!(from = %start, to = %end, settled = order.len(), "No path");
            return Err(QueryError::NoPath {
                from: start,
                to: end,
            });
        };

        let tight = |from: usize, edge: &Edge| {
            settled[edge.to] && dist[from].map(|d| d + edge.cost) == dist[edge.to]
        };

        let mut hops = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        hops[source] = 0;
        queue.push_back(source);
        for &node in &order {
            for edge in self.graph.edges(node) {
                if edge.cost > Duration::zero() && tight(node, edge) && hops[edge.to] != 0 {
                    hops[edge.to] = 0;
                    queue.push_back(edge.to);
                }
            }
        }
        while let Some(node) = queue.pop_front() {
            for edge in self.graph.edges(node) {
                if edge.cost == Duration::zero() && tight(node, edge) && hops[edge.to] == usize::MAX {
                    hops[edge.to] = hops[node] + 1;
                    queue.push_back(edge.to);
                }
            }
        }

        // Every kept edge goes strictly forward in this order
        order.sort_by_key(|&node| (dist[node], hops[node], node));

        let mut pred: Vec<Pred> = vec![None; n];
        let mut changes: Vec<Option<Vec<ChangeId>>> = vec![None; n];
        changes[source] = Some(Vec::new());

        for &node in &order {
            let Some(so_far) = changes[node].clone() else {
                continue;
            };
            for edge in self.graph.edges(node) {
                if !tight(node, edge) {
                    continue;
                }
                // Zero-cost edges sideways or back within one distance
                // would close a loop
                if edge.cost == Duration::zero() && hops[edge.to] != hops[node].saturating_add(1) {
                    continue;
                }

                let mut candidate = so_far.clone();
                if let EdgeKind::Change(id) = edge.kind {
                    candidate.push(id);
                }
                let replace = match &changes[edge.to] {
                    None => true,
                    Some(incumbent) => {
                        compare_tied(self.network, &candidate, incumbent) == Ordering::Less
                    }
                };
                if replace {
                    changes[edge.to] = Some(candidate);
                    pred[edge.to] = Some((node, *edge));
                }
            }
        }

        debug!(
            from = %start,
            to = %end,
            settled = order.len(),
            total_secs = total.num_seconds(),
            "Path resolved"
        );
        Ok(pred)
    }

    /// Edges from the source to `node`, in travel order.
    fn walk_back(&self, pred: &[Pred], node: usize) -> Vec<(usize, Edge)> {
        let mut path = Vec::new();
        let mut current = node;
        while let Some((prev, edge)) = pred[current] {
            path.push((prev, edge));
            current = prev;
        }
        path.reverse();
        path
    }

    /// Turn a path of graph edges into journey legs.
    ///
    /// Consecutive ride edges, and ride edges joined by a chain edge, become
    /// a single ride leg named after the route it was boarded on.
    fn legs(&self, path: &[(usize, Edge)]) -> Vec<Leg> {
        let mut legs = Vec::new();
        let mut ride: Option<OpenRide> = None;

        for &(from, edge) in path {
            match edge.kind {
                EdgeKind::Board => {
                    let Some(route) = self.route_at(edge.to) else {
                        continue;
                    };
                    let wait = board_wait(route, &self.config);
                    if wait > Duration::zero() {
                        legs.push(Leg::Wait {
                            route: route.name().to_string(),
                            duration: wait,
                        });
                    }
                    // The rest is the first segment, ridden from one node back
                    let segment = edge.cost - wait;
                    if segment > Duration::zero() {
                        ride = Some(OpenRide {
                            start: edge.to - 1,
                            duration: segment,
                        });
                    }
                }
                EdgeKind::Chain => {}
                EdgeKind::Ride => {
                    let open = ride.get_or_insert_with(|| OpenRide {
                        start: from,
                        duration: Duration::zero(),
                    });
                    open.duration += edge.cost;
                }
                EdgeKind::Change(id) => {
                    if let Some(open) = ride.take() {
                        legs.extend(self.ride_leg(open, from));
                    }
                    legs.extend(self.change_leg(id, edge.cost));
                }
                EdgeKind::Alight => {
                    if let Some(open) = ride.take() {
                        legs.extend(self.ride_leg(open, from));
                    }
                }
            }
        }

        legs
    }

    fn route_at(&self, node: usize) -> Option<&Route> {
        match self.graph.node(node) {
            Node::Riding { route, .. } => self.network.routes().get(route),
            _ => None,
        }
    }

    fn station_at(&self, node: usize) -> Option<&Station> {
        match self.graph.node(node) {
            Node::Riding { route, position } => {
                let code = self.network.routes().get(route)?.stations().get(position)?;
                self.network.station(code)
            }
            Node::Origin(code) | Node::Arrived(code) => self.network.station(&code),
        }
    }

    fn ride_leg(&self, open: OpenRide, end: usize) -> Option<Leg> {
        let route = self.route_at(open.start)?;
        Some(Leg::Ride {
            route: route.id().clone(),
            name: route.name().to_string(),
            from: self.station_at(open.start)?.clone(),
            to: self.station_at(end)?.clone(),
            duration: open.duration,
        })
    }

    fn change_leg(&self, id: ChangeId, cost: Duration) -> Option<Leg> {
        let change = self.network.change(id)?;
        let name = |route: &RouteId| {
            self.network
                .route(route)
                .map_or_else(|| route.to_string(), |r| r.name().to_string())
        };
        Some(Leg::Change {
            change: id,
            station: self.network.station(&change.station())?.clone(),
            from: name(change.from()),
            to: name(change.to()),
            duration: cost,
        })
    }
}

/// A ride leg still being accumulated.
struct OpenRide {
    start: usize,
    duration: Duration,
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
