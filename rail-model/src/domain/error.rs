//! Domain error types.
//!
//! Build-phase errors ([`NetworkError`]) describe a malformed scenario and are
//! raised while the network is being registered. Query-phase errors
//! ([`QueryError`]) are the only failures a frozen network can produce.

use super::{RouteId, StationCode};

/// Structural errors detected while building a network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// Route violates its own invariants
    #[error("invalid route {route}: {reason}")]
    InvalidRoute { route: RouteId, reason: String },

    /// Route identifier registered twice
    #[error("duplicate route {0}")]
    DuplicateRoute(RouteId),

    /// Reference to a route that has not been registered
    #[error("unknown route {0}")]
    UnknownRoute(RouteId),

    /// Reference to a station missing from the registry
    #[error("unknown station {0}")]
    UnknownStation(StationCode),

    /// Station code registered twice with different names
    #[error("station {code} already registered as {existing:?}")]
    DuplicateStation { code: StationCode, existing: String },

    /// Change is malformed or does not fit its routes
    #[error("invalid change at {station} from {from} to {to}: {reason}")]
    InvalidChange {
        station: StationCode,
        from: RouteId,
        to: RouteId,
        reason: String,
    },

    /// Preference names unregistered or non-comparable changes
    #[error("invalid preference: {0}")]
    InvalidPreference(String),
}

/// Errors returned by queries against a frozen network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Station absent from the route, unknown, or asked for in reverse
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The two stations are not connected
    #[error("no path from {from} to {to}")]
    NoPath { from: StationCode, to: StationCode },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    #[test]
    fn error_display() {
        let err = NetworkError::InvalidRoute {
            route: RouteId::new("CR2"),
            reason: "frequency must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid route CR2: frequency must be positive"
        );

        let err = NetworkError::DuplicateRoute(RouteId::new("CR2"));
        assert_eq!(err.to_string(), "duplicate route CR2");

        let err = NetworkError::UnknownStation(code("XYZ"));
        assert_eq!(err.to_string(), "unknown station XYZ");

        let err = NetworkError::InvalidChange {
            station: code("CLJ"),
            from: RouteId::new("SWML"),
            to: RouteId::new("CR2"),
            reason: "station not served by CR2".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid change at CLJ from SWML to CR2: station not served by CR2"
        );

        let err = QueryError::NoPath {
            from: code("WIM"),
            to: code("CWF"),
        };
        assert_eq!(err.to_string(), "no path from WIM to CWF");
    }
}
