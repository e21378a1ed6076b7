//! Mutable registration phase of a network.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::domain::{
    Change, ChangeId, Corridor, NetworkError, PreferredChange, Route, RouteId, Station,
    StationCode,
};
use crate::stations::StationRegistry;

use super::model::Network;

/// Collects stations, routes, changes and preferences, validating each as
/// it is registered.
///
/// Every structural check happens here or in [`NetworkBuilder::build`], so a
/// [`Network`] can only fail a query with "no path" or a bad station, never
/// with malformed data.
///
/// # Examples
///
/// ```
/// use rail_model::domain::{Change, Route, RouteId, Station, StationCode};
/// use rail_model::network::NetworkBuilder;
///
/// let code = |s| StationCode::parse(s).unwrap();
/// let mut builder = NetworkBuilder::new();
/// for (c, name) in [("X", "Exton"), ("Y", "Wyeford"), ("Z", "Zedbury")] {
///     builder.add_station(Station::new(code(c), name)).unwrap();
/// }
/// builder.add_route(Route::new(RouteId::new("A"), "Alpha", 6, vec![code("X"), code("Y")], vec![5]).unwrap()).unwrap();
/// builder.add_route(Route::new(RouteId::new("B"), "Beta", 6, vec![code("Y"), code("Z")], vec![4]).unwrap()).unwrap();
/// builder.add_change(Change::new(code("Y"), RouteId::new("A"), RouteId::new("B"), 2, 4).unwrap()).unwrap();
///
/// let network = builder.build().unwrap();
/// assert_eq!(network.routes().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    stations: StationRegistry,
    routes: Vec<Route>,
    route_index: HashMap<RouteId, usize>,
    changes: Vec<Change>,
    change_keys: HashSet<(StationCode, RouteId, RouteId)>,
    preferences: Vec<PreferredChange>,
}

impl NetworkBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station.
    pub fn add_station(&mut self, station: Station) -> Result<(), NetworkError> {
        debug!(station = %station.code, name = %station.name, "Registering station");
        self.stations.register(station)
    }

    /// Register a route.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::DuplicateRoute`] if the identifier is taken
    /// - [`NetworkError::UnknownStation`] if it calls at an unregistered station
    ///
    /// The route's own invariants were checked by [`Route::new`]; its
    /// continuation is resolved in [`NetworkBuilder::build`].
    pub fn add_route(&mut self, route: Route) -> Result<(), NetworkError> {
        if self.route_index.contains_key(route.id()) {
            return Err(NetworkError::DuplicateRoute(route.id().clone()));
        }
        for station in route.stations() {
            self.stations.require(*station)?;
        }

        debug!(
            route = %route.id(),
            stations = route.stations().len(),
            frequency = route.frequency(),
            "Registering route"
        );

        self.route_index.insert(route.id().clone(), self.routes.len());
        self.routes.push(route);
        Ok(())
    }

    /// Register a change between two already-registered routes.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnknownRoute`] if either route is not registered
    /// - [`NetworkError::InvalidChange`] if the station is not on both routes
    ///   or the same change is already registered
    pub fn add_change(&mut self, change: Change) -> Result<ChangeId, NetworkError> {
        let from = self.registered_route(change.from())?;
        let to = self.registered_route(change.to())?;
        change.validate_against(from, to)?;

        let key = (change.station(), change.from().clone(), change.to().clone());
        if !self.change_keys.insert(key) {
            return Err(NetworkError::InvalidChange {
                station: change.station(),
                from: change.from().clone(),
                to: change.to().clone(),
                reason: "already registered".into(),
            });
        }

        let id = ChangeId(self.changes.len());
        debug!(change = %change, id = %id, "Registering change");
        self.changes.push(change);
        Ok(id)
    }

    /// Register a preference for `preferred` over `alternative`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidPreference`] if either change is not
    /// registered, both name the same change, the changes do not leave the
    /// same route at the same station, or the opposite preference exists.
    pub fn add_preferred_change(
        &mut self,
        preferred: ChangeId,
        alternative: ChangeId,
    ) -> Result<(), NetworkError> {
        let lookup = |id: ChangeId| {
            self.changes.get(id.0).ok_or_else(|| {
                NetworkError::InvalidPreference(format!("change {id} is not registered"))
            })
        };
        let first = lookup(preferred)?;
        let second = lookup(alternative)?;

        if preferred == alternative {
            return Err(NetworkError::InvalidPreference(format!(
                "change {preferred} cannot be preferred over itself"
            )));
        }
        if !first.is_alternative_to(second) {
            return Err(NetworkError::InvalidPreference(format!(
                "{first} and {second} are not alternatives from the same station and route"
            )));
        }

        let pref = PreferredChange {
            preferred,
            alternative,
        };
        let reversed = PreferredChange {
            preferred: alternative,
            alternative: preferred,
        };
        if self.preferences.contains(&reversed) {
            return Err(NetworkError::InvalidPreference(format!(
                "{second} is already preferred over {first}"
            )));
        }
        if self.preferences.contains(&pref) {
            return Ok(());
        }

        debug!(preferred = %first, alternative = %second, "Registering preference");
        self.preferences.push(pref);
        Ok(())
    }

    /// Look up a registered route.
    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.route_index.get(id).map(|&idx| &self.routes[idx])
    }

    /// Freeze the network.
    ///
    /// Resolves every route's continuation chain into a corridor.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnknownRoute`] if a continuation is not registered
    /// - [`NetworkError::InvalidRoute`] if a continuation does not join at the
    ///   boundary station, loops, or revisits a station
    pub fn build(self) -> Result<Network, NetworkError> {
        let corridors = self
            .routes
            .iter()
            .map(|route| Corridor::assemble(route, |id| self.route(id)))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            stations = self.stations.len(),
            routes = self.routes.len(),
            changes = self.changes.len(),
            preferences = self.preferences.len(),
            "Network built"
        );

        Ok(Network::from_parts(
            self.stations,
            self.routes,
            self.route_index,
            corridors,
            self.changes,
            self.preferences,
        ))
    }

    fn registered_route(&self, id: &RouteId) -> Result<&Route, NetworkError> {
        self.route(id)
            .ok_or_else(|| NetworkError::UnknownRoute(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn route(id: &str, stations: &[&str], times: &[u32]) -> Route {
        Route::new(
            RouteId::new(id),
            id,
            6,
            stations.iter().map(|s| code(s)).collect(),
            times.to_vec(),
        )
        .unwrap()
    }

    fn change(station: &str, from: &str, to: &str, min: u32, max: u32) -> Change {
        Change::new(code(station), RouteId::new(from), RouteId::new(to), min, max).unwrap()
    }

    fn builder_with_stations(codes: &[&str]) -> NetworkBuilder {
        let mut builder = NetworkBuilder::new();
        for c in codes {
            builder.add_station(Station::new(code(c), *c)).unwrap();
        }
        builder
    }

    #[test]
    fn duplicate_route_rejected() {
        let mut builder = builder_with_stations(&["X", "Y"]);
        builder.add_route(route("A", &["X", "Y"], &[5])).unwrap();
        let err = builder.add_route(route("A", &["X", "Y"], &[6])).unwrap_err();
        assert_eq!(err, NetworkError::DuplicateRoute(RouteId::new("A")));
    }

    #[test]
    fn route_with_unregistered_station_rejected() {
        let mut builder = builder_with_stations(&["X"]);
        let err = builder.add_route(route("A", &["X", "Y"], &[5])).unwrap_err();
        assert_eq!(err, NetworkError::UnknownStation(code("Y")));
    }

    #[test]
    fn change_requires_registered_routes() {
        let mut builder = builder_with_stations(&["X", "Y", "Z"]);
        builder.add_route(route("A", &["X", "Y"], &[5])).unwrap();
        let err = builder.add_change(change("Y", "A", "B", 2, 4)).unwrap_err();
        assert_eq!(err, NetworkError::UnknownRoute(RouteId::new("B")));
    }

    #[test]
    fn change_requires_station_on_both_routes() {
        let mut builder = builder_with_stations(&["X", "Y", "Z"]);
        builder.add_route(route("A", &["X", "Y"], &[5])).unwrap();
        builder.add_route(route("B", &["Y", "Z"], &[4])).unwrap();
        let err = builder.add_change(change("X", "A", "B", 2, 4)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidChange { .. }));
    }

    #[test]
    fn duplicate_change_rejected() {
        let mut builder = builder_with_stations(&["X", "Y", "Z"]);
        builder.add_route(route("A", &["X", "Y"], &[5])).unwrap();
        builder.add_route(route("B", &["Y", "Z"], &[4])).unwrap();
        assert_eq!(
            builder.add_change(change("Y", "A", "B", 2, 4)).unwrap(),
            ChangeId(0)
        );
        let err = builder.add_change(change("Y", "A", "B", 1, 3)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidChange { reason, .. } if reason == "already registered"));
    }

    fn fork() -> (NetworkBuilder, ChangeId, ChangeId, ChangeId) {
        // A runs X -> Y; at Y one can join B or C. D runs Y -> W from W's side.
        let mut builder = builder_with_stations(&["X", "Y", "Z", "W"]);
        builder.add_route(route("A", &["X", "Y"], &[5])).unwrap();
        builder.add_route(route("B", &["Y", "Z"], &[4])).unwrap();
        builder.add_route(route("C", &["Y", "W", "Z"], &[2, 2])).unwrap();
        builder.add_route(route("D", &["W", "Y"], &[2])).unwrap();
        let ab = builder.add_change(change("Y", "A", "B", 2, 4)).unwrap();
        let ac = builder.add_change(change("Y", "A", "C", 2, 4)).unwrap();
        let dc = builder.add_change(change("Y", "D", "C", 2, 4)).unwrap();
        (builder, ab, ac, dc)
    }

    #[test]
    fn preference_between_alternatives_accepted() {
        let (mut builder, ab, ac, _) = fork();
        builder.add_preferred_change(ab, ac).unwrap();
        // Repeating it is harmless
        builder.add_preferred_change(ab, ac).unwrap();
        let network = builder.build().unwrap();
        assert!(network.is_preferred(ab, ac));
        assert!(!network.is_preferred(ac, ab));
        assert_eq!(network.preferences().len(), 1);
    }

    #[test]
    fn preference_requires_shared_origin() {
        let (mut builder, ab, _, dc) = fork();
        let err = builder.add_preferred_change(ab, dc).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidPreference(_)));
    }

    #[test]
    fn preference_requires_registered_changes() {
        let (mut builder, ab, _, _) = fork();
        let err = builder.add_preferred_change(ab, ChangeId(99)).unwrap_err();
        assert_eq!(
            err,
            NetworkError::InvalidPreference("change #99 is not registered".into())
        );
    }

    #[test]
    fn preference_over_itself_rejected() {
        let (mut builder, ab, _, _) = fork();
        assert!(builder.add_preferred_change(ab, ab).is_err());
    }

    #[test]
    fn contradictory_preference_rejected() {
        let (mut builder, ab, ac, _) = fork();
        builder.add_preferred_change(ab, ac).unwrap();
        let err = builder.add_preferred_change(ac, ab).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidPreference(_)));
    }

    #[test]
    fn build_rejects_unknown_continuation() {
        let mut builder = builder_with_stations(&["X", "Y"]);
        builder
            .add_route(route("A", &["X", "Y"], &[5]).with_continuation(RouteId::new("T")))
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err, NetworkError::UnknownRoute(RouteId::new("T")));
    }

    #[test]
    fn build_accepts_forward_continuation_reference() {
        let mut builder = builder_with_stations(&["X", "Y", "Z"]);
        builder
            .add_route(route("BRANCH", &["X", "Y"], &[5]).with_continuation(RouteId::new("TRUNK")))
            .unwrap();
        builder.add_route(route("TRUNK", &["Y", "Z"], &[4])).unwrap();
        let network = builder.build().unwrap();
        let corridor = network.corridor(&RouteId::new("BRANCH")).unwrap();
        assert_eq!(corridor.routes().len(), 2);
    }
}
