//! Frozen, read-only network.

use std::collections::HashMap;

use crate::domain::{Change, ChangeId, Corridor, PreferredChange, Route, RouteId, Station, StationCode};
use crate::stations::StationRegistry;

/// The frozen aggregate of stations, routes, changes and preferences.
///
/// Produced by [`NetworkBuilder::build`](super::NetworkBuilder::build).
/// There are no mutating methods, so a `Network` can be shared between
/// threads and queried concurrently.
#[derive(Debug)]
pub struct Network {
    stations: StationRegistry,
    routes: Vec<Route>,
    route_index: HashMap<RouteId, usize>,
    /// Parallel to `routes`.
    corridors: Vec<Corridor>,
    changes: Vec<Change>,
    routes_by_station: HashMap<StationCode, Vec<usize>>,
    changes_by_station: HashMap<StationCode, Vec<ChangeId>>,
    preferences: Vec<PreferredChange>,
}

impl Network {
    pub(super) fn from_parts(
        stations: StationRegistry,
        routes: Vec<Route>,
        route_index: HashMap<RouteId, usize>,
        corridors: Vec<Corridor>,
        changes: Vec<Change>,
        preferences: Vec<PreferredChange>,
    ) -> Self {
        let mut routes_by_station: HashMap<StationCode, Vec<usize>> = HashMap::new();
        for (idx, route) in routes.iter().enumerate() {
            for station in route.stations() {
                routes_by_station.entry(*station).or_default().push(idx);
            }
        }

        let mut changes_by_station: HashMap<StationCode, Vec<ChangeId>> = HashMap::new();
        for (idx, change) in changes.iter().enumerate() {
            changes_by_station
                .entry(change.station())
                .or_default()
                .push(ChangeId(idx));
        }

        Self {
            stations,
            routes,
            route_index,
            corridors,
            changes,
            routes_by_station,
            changes_by_station,
            preferences,
        }
    }

    /// The station registry.
    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Look up a station by code.
    pub fn station(&self, code: &StationCode) -> Option<&Station> {
        self.stations.get(code)
    }

    /// All routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a route by identifier.
    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.route_index(id).map(|idx| &self.routes[idx])
    }

    /// Registration index of a route.
    pub fn route_index(&self, id: &RouteId) -> Option<usize> {
        self.route_index.get(id).copied()
    }

    /// The corridor headed by a route.
    pub fn corridor(&self, id: &RouteId) -> Option<&Corridor> {
        self.route_index(id).map(|idx| &self.corridors[idx])
    }

    /// Routes calling at a station, in registration order.
    pub fn routes_through(&self, station: StationCode) -> impl Iterator<Item = &Route> {
        self.routes_by_station
            .get(&station)
            .into_iter()
            .flatten()
            .map(|&idx| &self.routes[idx])
    }

    /// Changes registered at a station, in registration order.
    pub fn changes_at(&self, station: StationCode) -> impl Iterator<Item = (ChangeId, &Change)> {
        self.changes_by_station
            .get(&station)
            .into_iter()
            .flatten()
            .map(|&id| (id, &self.changes[id.0]))
    }

    /// All changes with their identifiers, in registration order.
    pub fn changes(&self) -> impl Iterator<Item = (ChangeId, &Change)> {
        self.changes
            .iter()
            .enumerate()
            .map(|(idx, change)| (ChangeId(idx), change))
    }

    /// Look up a change.
    pub fn change(&self, id: ChangeId) -> Option<&Change> {
        self.changes.get(id.0)
    }

    /// All registered preferences.
    pub fn preferences(&self) -> &[PreferredChange] {
        &self.preferences
    }

    /// True if a registered preference favours `change` over `over`.
    pub fn is_preferred(&self, change: ChangeId, over: ChangeId) -> bool {
        self.preference_between(change, over)
            .is_some_and(|p| p.preferred == change)
    }

    /// The preference governing two changes, in either order.
    pub fn preference_between(&self, a: ChangeId, b: ChangeId) -> Option<&PreferredChange> {
        let (first, second) = (self.change(a)?, self.change(b)?);
        self.preferences
            .iter()
            .find(|p| p.applies((a, first), (b, second)))
    }
}
