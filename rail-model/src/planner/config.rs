//! Resolver configuration.

use crate::domain::InterchangeEstimate;

/// Configuration parameters for path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Which point of each change's window is charged.
    pub interchange: InterchangeEstimate,

    /// Charge the first route's expected wait when boarding.
    /// Turning this off compares in-vehicle and interchange time only.
    pub first_wait: bool,

    /// Ride at least one segment of the first route before any change.
    ///
    /// This is a modelling restriction on top of the plain board/ride/change
    /// graph: with it off, a journey may board a frequent route and change
    /// straight onto an infrequent one at the start station, paying the
    /// frequent route's short wait plus the interchange instead of the
    /// infrequent route's own wait.
    pub ride_before_change: bool,
}

impl ResolverConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(interchange: InterchangeEstimate, first_wait: bool) -> Self {
        Self {
            interchange,
            first_wait,
            ride_before_change: true,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(InterchangeEstimate::Midpoint, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ResolverConfig::default();

        assert_eq!(config.interchange, InterchangeEstimate::Midpoint);
        assert!(config.first_wait);
        assert!(config.ride_before_change);
    }

    #[test]
    fn custom_config() {
        let config = ResolverConfig::new(InterchangeEstimate::Maximum, false);

        assert_eq!(config.interchange, InterchangeEstimate::Maximum);
        assert!(!config.first_wait);
        assert!(config.ride_before_change);
    }
}
