//! Route and corridor types.
//!
//! A `Route` is one directed rail service: an ordered list of stations with
//! the running time of each segment and a service frequency. A `Corridor` is
//! a route followed by its chain of continuation routes, assembled once when
//! the network is frozen.

use std::collections::HashSet;
use std::fmt;

use chrono::Duration;

use super::time::minutes;
use super::{NetworkError, QueryError, StationCode};

/// Identifier of a route, unique within a network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    /// Creates a route identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed rail service.
///
/// # Invariants
///
/// - At least two stations, all distinct
/// - One segment time per consecutive station pair, each positive
/// - Frequency (trains per hour) is positive
///
/// Reverse traversal is never allowed; the opposite direction is a separate
/// route.
#[derive(Debug, Clone)]
pub struct Route {
    id: RouteId,
    name: String,
    frequency: u32,
    stations: Vec<StationCode>,
    times: Vec<u32>,
    continuation: Option<RouteId>,
}

impl Route {
    /// Construct a route, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidRoute`] if:
    /// - the identifier is empty
    /// - `frequency` is zero
    /// - fewer than two stations are given, or a station repeats
    /// - `times.len() != stations.len() - 1`, or any segment time is zero
    ///
    /// # Examples
    ///
    /// ```
    /// use rail_model::domain::{Route, RouteId, StationCode};
    ///
    /// let wim = StationCode::parse("WIM").unwrap();
    /// let too = StationCode::parse("TOO").unwrap();
    /// let clj = StationCode::parse("CLJ").unwrap();
    ///
    /// let route = Route::new(RouteId::new("CR2"), "CR2", 30, vec![wim, too, clj], vec![4, 6]).unwrap();
    /// assert_eq!(route.travel_time(wim, clj).unwrap().num_minutes(), 10);
    ///
    /// // Segment count must match
    /// assert!(Route::new(RouteId::new("CR2"), "CR2", 30, vec![wim, too, clj], vec![4]).is_err());
    /// ```
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        frequency: u32,
        stations: Vec<StationCode>,
        times: Vec<u32>,
    ) -> Result<Self, NetworkError> {
        let invalid = |reason: String| NetworkError::InvalidRoute {
            route: id.clone(),
            reason,
        };

        if id.as_str().is_empty() {
            return Err(invalid("identifier must not be empty".into()));
        }
        if frequency == 0 {
            return Err(invalid("frequency must be positive".into()));
        }
        if stations.len() < 2 {
            return Err(invalid("must have at least two stations".into()));
        }
        if times.len() != stations.len() - 1 {
            return Err(invalid(format!(
                "{} stations need {} segment times, got {}",
                stations.len(),
                stations.len() - 1,
                times.len()
            )));
        }
        if let Some(idx) = times.iter().position(|&t| t == 0) {
            return Err(invalid(format!(
                "segment {} to {} must take at least one minute",
                stations[idx],
                stations[idx + 1]
            )));
        }

        let mut seen = HashSet::with_capacity(stations.len());
        for station in &stations {
            if !seen.insert(*station) {
                return Err(invalid(format!("station {station} appears more than once")));
            }
        }

        Ok(Route {
            id,
            name: name.into(),
            frequency,
            stations,
            times,
            continuation: None,
        })
    }

    /// Declares the route this one continues into.
    ///
    /// The continuation is resolved and checked when the network is built.
    pub fn with_continuation(mut self, next: RouteId) -> Self {
        self.continuation = Some(next);
        self
    }

    /// Returns the route identifier.
    pub fn id(&self) -> &RouteId {
        &self.id
    }

    /// Returns the display name (usually the line or operator).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the frequency in trains per hour.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Returns the stations in running order.
    pub fn stations(&self) -> &[StationCode] {
        &self.stations
    }

    /// Returns the segment times in minutes.
    pub fn segment_times(&self) -> &[u32] {
        &self.times
    }

    /// Returns the declared continuation, if any.
    pub fn continuation(&self) -> Option<&RouteId> {
        self.continuation.as_ref()
    }

    pub fn first_station(&self) -> StationCode {
        self.stations[0]
    }

    pub fn last_station(&self) -> StationCode {
        self.stations[self.stations.len() - 1]
    }

    /// Returns the index of a station on this route.
    pub fn position(&self, station: StationCode) -> Option<usize> {
        self.stations.iter().position(|s| *s == station)
    }

    /// Returns true if the route calls at the station.
    pub fn serves(&self, station: StationCode) -> bool {
        self.position(station).is_some()
    }

    /// Sum of all segment times.
    pub fn total_time(&self) -> Duration {
        sum_minutes(&self.times)
    }

    /// Running time between two stations, in route order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidQuery`] if either station is not on the
    /// route or `from` comes after `to`.
    pub fn travel_time(&self, from: StationCode, to: StationCode) -> Result<Duration, QueryError> {
        span_time(&self.id, &self.stations, &self.times, from, to)
    }

    /// Average wait for a turn-up-and-go service with even headways.
    ///
    /// Half the headway: `60 / frequency / 2` minutes, to the millisecond
    /// (rounded down where the frequency does not divide evenly).
    pub fn expected_wait(&self) -> Duration {
        expected_wait(self.frequency)
    }
}

fn expected_wait(frequency: u32) -> Duration {
    Duration::milliseconds(1_800_000 / i64::from(frequency))
}

/// Segment minutes summed as a `Duration`, so long routes cannot overflow.
fn sum_minutes(times: &[u32]) -> Duration {
    times
        .iter()
        .fold(Duration::zero(), |total, &time| total + minutes(time))
}

fn span_time(
    route: &RouteId,
    stations: &[StationCode],
    times: &[u32],
    from: StationCode,
    to: StationCode,
) -> Result<Duration, QueryError> {
    let position = |station: StationCode| {
        stations
            .iter()
            .position(|s| *s == station)
            .ok_or_else(|| QueryError::InvalidQuery(format!("{station} is not on route {route}")))
    };

    let from_idx = position(from)?;
    let to_idx = position(to)?;
    if from_idx > to_idx {
        return Err(QueryError::InvalidQuery(format!(
            "route {route} does not run from {from} to {to}"
        )));
    }

    Ok(sum_minutes(&times[from_idx..to_idx]))
}

/// A route together with its chain of continuation routes.
///
/// The boundary station shared by two consecutive routes appears once, and
/// crossing it costs nothing. The head route's frequency governs the wait
/// for the whole corridor: the branch is the bottleneck.
#[derive(Debug, Clone)]
pub struct Corridor {
    routes: Vec<RouteId>,
    stations: Vec<StationCode>,
    times: Vec<u32>,
    head_frequency: u32,
}

impl Corridor {
    /// Assemble the corridor starting at `head`, following continuations
    /// through `lookup`.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnknownRoute`] if a continuation cannot be found
    /// - [`NetworkError::InvalidRoute`] if a continuation does not start at
    ///   the previous route's last station, the chain loops, or the corridor
    ///   would call at a station twice
    pub fn assemble<'a, F>(head: &'a Route, lookup: F) -> Result<Self, NetworkError>
    where
        F: Fn(&RouteId) -> Option<&'a Route>,
    {
        let invalid = |reason: String| NetworkError::InvalidRoute {
            route: head.id.clone(),
            reason,
        };

        let mut routes = vec![head.id.clone()];
        let mut stations = head.stations.clone();
        let mut times = head.times.clone();
        let mut seen: HashSet<StationCode> = stations.iter().copied().collect();

        let mut current = head;
        while let Some(next_id) = current.continuation() {
            if routes.contains(next_id) {
                return Err(invalid(format!("continuation chain loops back to {next_id}")));
            }
            let next = lookup(next_id).ok_or_else(|| NetworkError::UnknownRoute(next_id.clone()))?;

            if next.first_station() != current.last_station() {
                return Err(invalid(format!(
                    "continuation {} starts at {} but {} ends at {}",
                    next.id,
                    next.first_station(),
                    current.id,
                    current.last_station()
                )));
            }

            for station in &next.stations[1..] {
                if !seen.insert(*station) {
                    return Err(invalid(format!(
                        "corridor calls at {station} more than once"
                    )));
                }
            }

            routes.push(next.id.clone());
            stations.extend_from_slice(&next.stations[1..]);
            times.extend_from_slice(&next.times);
            current = next;
        }

        Ok(Corridor {
            routes,
            stations,
            times,
            head_frequency: head.frequency,
        })
    }

    /// The head route.
    pub fn head(&self) -> &RouteId {
        &self.routes[0]
    }

    /// All routes in the corridor, head first.
    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    /// All stations in running order, boundaries counted once.
    pub fn stations(&self) -> &[StationCode] {
        &self.stations
    }

    /// Running time between two stations anywhere on the corridor.
    pub fn travel_time(&self, from: StationCode, to: StationCode) -> Result<Duration, QueryError> {
        span_time(self.head(), &self.stations, &self.times, from, to)
    }

    /// Sum of all segment times along the corridor.
    pub fn total_time(&self) -> Duration {
        sum_minutes(&self.times)
    }

    /// Expected wait when boarding at the head of the corridor.
    pub fn expected_wait(&self) -> Duration {
        expected_wait(self.head_frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn codes(list: &[&str]) -> Vec<StationCode> {
        list.iter().map(|s| code(s)).collect()
    }

    fn route(id: &str, freq: u32, stations: &[&str], times: &[u32]) -> Route {
        Route::new(RouteId::new(id), id, freq, codes(stations), times.to_vec()).unwrap()
    }

    fn invalid_reason(result: Result<Route, NetworkError>) -> String {
        match result {
            Err(NetworkError::InvalidRoute { reason, .. }) => reason,
            other => panic!("expected InvalidRoute, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_frequency() {
        let reason = invalid_reason(Route::new(
            RouteId::new("R"),
            "R",
            0,
            codes(&["A", "B"]),
            vec![3],
        ));
        assert_eq!(reason, "frequency must be positive");
    }

    #[test]
    fn rejects_single_station() {
        let reason = invalid_reason(Route::new(RouteId::new("R"), "R", 4, codes(&["A"]), vec![]));
        assert_eq!(reason, "must have at least two stations");
    }

    #[test]
    fn rejects_segment_count_mismatch() {
        let reason = invalid_reason(Route::new(
            RouteId::new("R"),
            "R",
            4,
            codes(&["A", "B", "C"]),
            vec![3, 4, 5],
        ));
        assert_eq!(reason, "3 stations need 2 segment times, got 3");
    }

    #[test]
    fn rejects_zero_segment_time() {
        let reason = invalid_reason(Route::new(
            RouteId::new("R"),
            "R",
            4,
            codes(&["A", "B", "C"]),
            vec![3, 0],
        ));
        assert_eq!(reason, "segment B to C must take at least one minute");
    }

    #[test]
    fn rejects_repeated_station() {
        let reason = invalid_reason(Route::new(
            RouteId::new("R"),
            "R",
            4,
            codes(&["A", "B", "A"]),
            vec![3, 3],
        ));
        assert_eq!(reason, "station A appears more than once");
    }

    #[test]
    fn rejects_empty_identifier() {
        let reason = invalid_reason(Route::new(
            RouteId::new(""),
            "R",
            4,
            codes(&["A", "B"]),
            vec![3],
        ));
        assert_eq!(reason, "identifier must not be empty");
    }

    #[test]
    fn travel_time_sums_segments_between_stations() {
        let r = route("CR2", 30, &["WIM", "TOO", "STE", "CLJ"], &[4, 3, 6]);
        assert_eq!(r.travel_time(code("WIM"), code("CLJ")).unwrap(), minutes(13));
        assert_eq!(r.travel_time(code("TOO"), code("STE")).unwrap(), minutes(3));
        assert_eq!(r.travel_time(code("STE"), code("STE")).unwrap(), minutes(0));
    }

    #[test]
    fn travel_time_rejects_reverse_direction() {
        let r = route("CR2", 30, &["WIM", "TOO", "STE", "CLJ"], &[4, 3, 6]);
        let err = r.travel_time(code("CLJ"), code("WIM")).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidQuery("route CR2 does not run from CLJ to WIM".into())
        );
    }

    #[test]
    fn travel_time_rejects_absent_station() {
        let r = route("CR2", 30, &["WIM", "TOO"], &[4]);
        let err = r.travel_time(code("WIM"), code("VIC")).unwrap_err();
        assert_eq!(err, QueryError::InvalidQuery("VIC is not on route CR2".into()));
    }

    #[test]
    fn expected_wait_is_half_the_headway() {
        assert_eq!(route("A", 30, &["A", "B"], &[1]).expected_wait(), minutes(1));
        assert_eq!(route("A", 6, &["A", "B"], &[1]).expected_wait(), minutes(5));
        assert_eq!(
            route("A", 4, &["A", "B"], &[1]).expected_wait(),
            Duration::seconds(450)
        );
    }

    #[test]
    fn expected_wait_keeps_fractional_seconds() {
        // 60 / 7 / 2 minutes is 257.142... seconds
        assert_eq!(
            route("A", 7, &["A", "B"], &[1]).expected_wait(),
            Duration::milliseconds(257_142)
        );
    }

    #[test]
    fn huge_segment_times_do_not_overflow() {
        let r = route("A", 4, &["A", "B", "C"], &[u32::MAX, u32::MAX]);
        let expected = Duration::minutes(2 * i64::from(u32::MAX));
        assert_eq!(r.total_time(), expected);
        assert_eq!(r.travel_time(code("A"), code("C")).unwrap(), expected);
    }

    #[test]
    fn accessors() {
        let r = route("SWML", 8, &["RAY", "WIM", "CLJ"], &[4, 8]).with_continuation(RouteId::new("X"));
        assert_eq!(r.first_station(), code("RAY"));
        assert_eq!(r.last_station(), code("CLJ"));
        assert_eq!(r.position(code("WIM")), Some(1));
        assert!(r.serves(code("CLJ")));
        assert!(!r.serves(code("VIC")));
        assert_eq!(r.continuation(), Some(&RouteId::new("X")));
        assert_eq!(r.total_time(), minutes(12));
    }

    fn lookup(routes: &[Route]) -> HashMap<RouteId, Route> {
        routes.iter().map(|r| (r.id().clone(), r.clone())).collect()
    }

    #[test]
    fn corridor_spans_continuations_without_extra_cost() {
        let trunk = route("CR2-WIM", 30, &["WIM", "TOO", "CLJ"], &[4, 9]);
        let branch =
            route("CR2-RAY", 20, &["RAY", "WIM"], &[4]).with_continuation(RouteId::new("CR2-WIM"));
        let map = lookup(&[trunk, branch.clone()]);

        let corridor = Corridor::assemble(&branch, |id| map.get(id)).unwrap();
        assert_eq!(
            corridor.routes(),
            &[RouteId::new("CR2-RAY"), RouteId::new("CR2-WIM")]
        );
        assert_eq!(corridor.stations(), codes(&["RAY", "WIM", "TOO", "CLJ"]).as_slice());
        assert_eq!(
            corridor.travel_time(code("RAY"), code("CLJ")).unwrap(),
            minutes(17)
        );
        assert_eq!(corridor.total_time(), minutes(17));
        // Branch frequency governs, not the sum of both
        assert_eq!(corridor.expected_wait(), Duration::seconds(90));
    }

    #[test]
    fn corridor_rejects_unknown_continuation() {
        let branch = route("B", 4, &["A", "B"], &[4]).with_continuation(RouteId::new("MISSING"));
        let map = lookup(&[branch.clone()]);
        let err = Corridor::assemble(&branch, |id| map.get(id)).unwrap_err();
        assert_eq!(err, NetworkError::UnknownRoute(RouteId::new("MISSING")));
    }

    #[test]
    fn corridor_rejects_boundary_mismatch() {
        let trunk = route("T", 4, &["C", "D"], &[4]);
        let branch = route("B", 4, &["A", "B"], &[4]).with_continuation(RouteId::new("T"));
        let map = lookup(&[trunk, branch.clone()]);
        let err = Corridor::assemble(&branch, |id| map.get(id)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidRoute { .. }));
    }

    #[test]
    fn corridor_rejects_cycle() {
        let a = route("A", 4, &["P", "Q"], &[4]).with_continuation(RouteId::new("B"));
        let b = route("B", 4, &["Q", "P"], &[4]).with_continuation(RouteId::new("A"));
        let map = lookup(&[a.clone(), b]);
        let err = Corridor::assemble(&a, |id| map.get(id)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidRoute { .. }));
    }
}
