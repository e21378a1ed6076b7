//! Station registry.

use std::collections::HashMap;

use crate::domain::{NetworkError, Station, StationCode};

/// Canonical set of stations known to a network.
///
/// Provides code → station lookup and remembers registration order, which
/// is the order used for station legends in reports.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: Vec<Station>,
    index: HashMap<StationCode, usize>,
}

impl StationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station.
    ///
    /// Registering the same code and name again is a no-op; the same code
    /// with a different name is rejected.
    pub fn register(&mut self, station: Station) -> Result<(), NetworkError> {
        if let Some(&idx) = self.index.get(&station.code) {
            let existing = &self.stations[idx];
            if existing.name == station.name {
                return Ok(());
            }
            return Err(NetworkError::DuplicateStation {
                code: station.code,
                existing: existing.name.clone(),
            });
        }

        self.index.insert(station.code, self.stations.len());
        self.stations.push(station);
        Ok(())
    }

    /// Look up a station by code.
    pub fn get(&self, code: &StationCode) -> Option<&Station> {
        self.index.get(code).map(|&idx| &self.stations[idx])
    }

    /// Look up a station, failing with `UnknownStation`.
    pub fn require(&self, code: StationCode) -> Result<&Station, NetworkError> {
        self.get(&code).ok_or(NetworkError::UnknownStation(code))
    }

    /// Display name for a code, falling back to the code itself.
    pub fn name<'a>(&'a self, code: &'a StationCode) -> &'a str {
        self.get(code).map_or(code.as_str(), |s| s.name.as_str())
    }

    pub fn contains(&self, code: &StationCode) -> bool {
        self.index.contains_key(code)
    }

    /// Stations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
