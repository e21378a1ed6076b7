//! Scenario loading error types.

use std::path::PathBuf;

use crate::domain::{InvalidStationCode, NetworkError};

/// Errors that can occur when loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Scenario file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse scenario JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A station code in the scenario is malformed
    #[error(transparent)]
    StationCode(#[from] InvalidStationCode),

    /// A preference names a change label nobody declared
    #[error("unknown change label {0:?}")]
    UnknownChangeLabel(String),

    /// Two changes share a label
    #[error("change label {0:?} used more than once")]
    DuplicateChangeLabel(String),

    /// The scenario describes an invalid network
    #[error("invalid network: {0}")]
    Network(#[from] NetworkError),
}
