//! Journey types.
//!
//! A `Journey` is the resolved answer for one station pair: an initial wait,
//! rides along routes, and changes between them. Its `Display` output is the
//! explanation text used in reports.

use std::fmt;

use chrono::Duration;

use super::time::format_minutes;
use super::{ChangeId, RouteId, Station};

/// One step of a journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leg {
    /// Waiting for the first train
    Wait { route: String, duration: Duration },
    /// Riding a route (or a corridor of chained routes)
    Ride {
        route: RouteId,
        name: String,
        from: Station,
        to: Station,
        duration: Duration,
    },
    /// Changing between routes at a station
    Change {
        change: ChangeId,
        station: Station,
        from: String,
        to: String,
        duration: Duration,
    },
}

impl Leg {
    /// Returns the time this leg contributes.
    pub fn duration(&self) -> Duration {
        match self {
            Leg::Wait { duration, .. } | Leg::Ride { duration, .. } | Leg::Change { duration, .. } => {
                *duration
            }
        }
    }

    /// Returns true if this is a change.
    pub fn is_change(&self) -> bool {
        matches!(self, Leg::Change { .. })
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Wait { route, duration } => {
                write!(f, "Wait for {route}: {}", format_minutes(*duration))
            }
            Leg::Ride {
                name,
                from,
                to,
                duration,
                ..
            } => write!(f, "{name} from {from} to {to}: {}", format_minutes(*duration)),
            Leg::Change {
                station,
                from,
                to,
                duration,
                ..
            } => write!(
                f,
                "Change at {station} from {from} to {to}: {}",
                format_minutes(*duration)
            ),
        }
    }
}

/// A resolved journey between two stations.
///
/// # Invariants
///
/// - `total` is the sum of the leg durations
/// - A journey from a station to itself has no legs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    from: Station,
    to: Station,
    legs: Vec<Leg>,
    total: Duration,
}

impl Journey {
    /// Constructs a journey, totalling its legs.
    pub fn new(from: Station, to: Station, legs: Vec<Leg>) -> Self {
        let total = legs
            .iter()
            .fold(Duration::zero(), |acc, leg| acc + leg.duration());
        Self {
            from,
            to,
            legs,
            total,
        }
    }

    /// A zero-time journey from a station to itself.
    pub fn trivial(station: Station) -> Self {
        Self::new(station.clone(), station, Vec::new())
    }

    pub fn from(&self) -> &Station {
        &self.from
    }

    pub fn to(&self) -> &Station {
        &self.to
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Total estimated journey time.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of interchanges.
    pub fn change_count(&self) -> usize {
        self.legs.iter().filter(|l| l.is_change()).count()
    }

    /// Routes ridden, in order.
    pub fn routes(&self) -> Vec<&RouteId> {
        self.legs
            .iter()
            .filter_map(|leg| match leg {
                Leg::Ride { route, .. } => Some(route),
                _ => None,
            })
            .collect()
    }

    /// Changes taken, in order.
    pub fn changes(&self) -> Vec<ChangeId> {
        self.legs
            .iter()
            .filter_map(|leg| match leg {
                Leg::Change { change, .. } => Some(*change),
                _ => None,
            })
            .collect()
    }

    /// Returns true if no travel is needed.
    pub fn is_trivial(&self) -> bool {
        self.legs.is_empty()
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From {} to {}", self.from, self.to)?;
        for leg in &self.legs {
            writeln!(f, "- {leg}")?;
        }
        write!(f, "Total: {}", format_minutes(self.total))
    }
}
