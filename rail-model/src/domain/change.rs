//! Interchange types.
//!
//! A `Change` is the possibility of moving from one route to another at a
//! station, with a plausible dwell window. A `PreferredChange` ranks two
//! alternative changes from the same place; it never alters their cost.

use std::fmt;

use chrono::Duration;

use super::time::minutes;
use super::{NetworkError, Route, RouteId, StationCode};

/// Which point of an interchange window is used as its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterchangeEstimate {
    /// Best case: the connection is always tight.
    Minimum,
    /// Average case: midpoint of the window, rounded to the nearest minute.
    #[default]
    Midpoint,
    /// Worst case planning.
    Maximum,
}

/// Minimum and maximum plausible interchange minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterchangeWindow {
    min: u32,
    max: u32,
}

impl InterchangeWindow {
    /// Creates a window; returns `None` if `min > max`.
    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Midpoint in whole minutes, halves rounded up.
    pub fn midpoint(&self) -> u32 {
        // min <= max, so neither step can overflow
        self.min + (self.max - self.min).div_ceil(2)
    }

    /// Point of the window selected by `estimate`, in minutes.
    pub fn estimate(&self, estimate: InterchangeEstimate) -> u32 {
        match estimate {
            InterchangeEstimate::Minimum => self.min,
            InterchangeEstimate::Midpoint => self.midpoint(),
            InterchangeEstimate::Maximum => self.max,
        }
    }
}

/// Handle to a change registered in a network, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangeId(pub(crate) usize);

impl ChangeId {
    /// Registration index of the change.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed interchange from one route to another at a station.
///
/// # Invariants
///
/// - `min <= max` (both unsigned, so never negative)
/// - source and destination routes differ
///
/// Station membership in both routes is checked by
/// [`Change::validate_against`] when the change is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    station: StationCode,
    from: RouteId,
    to: RouteId,
    window: InterchangeWindow,
    label: Option<String>,
}

impl Change {
    /// Construct a change with an interchange window of `min..=max` minutes.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidChange`] if `min > max` or the two
    /// routes are the same.
    pub fn new(
        station: StationCode,
        from: RouteId,
        to: RouteId,
        min: u32,
        max: u32,
    ) -> Result<Self, NetworkError> {
        if from == to {
            return Err(NetworkError::InvalidChange {
                station,
                from,
                to,
                reason: "source and destination route are the same".into(),
            });
        }

        let Some(window) = InterchangeWindow::new(min, max) else {
            return Err(NetworkError::InvalidChange {
                station,
                from,
                to,
                reason: format!("window minimum {min} exceeds maximum {max}"),
            });
        };

        Ok(Change {
            station,
            from,
            to,
            window,
            label: None,
        })
    }

    /// Attaches a human-readable label (used by scenario files and logs).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn station(&self) -> StationCode {
        self.station
    }

    /// Route being left.
    pub fn from(&self) -> &RouteId {
        &self.from
    }

    /// Route being joined.
    pub fn to(&self) -> &RouteId {
        &self.to
    }

    pub fn window(&self) -> InterchangeWindow {
        self.window
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Checks the station is served by both routes.
    ///
    /// `from` and `to` must be the routes this change names.
    pub fn validate_against(&self, from: &Route, to: &Route) -> Result<(), NetworkError> {
        for route in [from, to] {
            if !route.serves(self.station) {
                return Err(NetworkError::InvalidChange {
                    station: self.station,
                    from: self.from.clone(),
                    to: self.to.clone(),
                    reason: format!("station not served by {}", route.id()),
                });
            }
        }
        Ok(())
    }

    /// Representative interchange time: midpoint of the window.
    pub fn interchange_cost(&self) -> Duration {
        minutes(self.window.midpoint())
    }

    /// Interchange time under a chosen convention.
    pub fn estimate(&self, estimate: InterchangeEstimate) -> Duration {
        minutes(self.window.estimate(estimate))
    }

    /// True if both changes leave the same route at the same station.
    pub fn is_alternative_to(&self, other: &Change) -> bool {
        self.station == other.station && self.from == other.from
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} at {} ({}-{} mins)",
            self.from, self.to, self.station, self.window.min, self.window.max
        )
    }
}

/// Precedence between two alternative changes.
///
/// Pure annotation: consulted only to break ties between equally quick
/// journeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferredChange {
    pub preferred: ChangeId,
    pub alternative: ChangeId,
}

impl PreferredChange {
    /// True if the two changes are alternatives from the same place and this
    /// preference names them, in either order.
    pub fn applies(&self, a: (ChangeId, &Change), b: (ChangeId, &Change)) -> bool {
        a.1.is_alternative_to(b.1)
            && ((a.0 == self.preferred && b.0 == self.alternative)
                || (a.0 == self.alternative && b.0 == self.preferred))
    }
}
