//! Scenario file DTOs.
//!
//! These types map directly to the JSON scenario format. Station codes and
//! route identifiers stay as strings here; they are checked when the
//! scenario is turned into a network.

use serde::Deserialize;

use crate::domain::InterchangeEstimate;
use crate::planner::ResolverConfig;

/// A whole scenario: the network plus what to report on.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub stations: Vec<StationDto>,

    pub routes: Vec<RouteDto>,

    #[serde(default)]
    pub changes: Vec<ChangeDto>,

    /// Preferences between changes, by label.
    #[serde(default)]
    pub preferences: Vec<PreferenceDto>,

    #[serde(default)]
    pub resolver: ResolverOptions,

    pub report: ReportDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationDto {
    pub code: String,
    pub name: String,
}

/// A directed service pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDto {
    pub id: String,

    /// Display name; several routes may share one (e.g. all branches of a line).
    pub name: String,

    /// Trains per hour.
    pub frequency: u32,

    pub stations: Vec<String>,

    /// Minutes between consecutive stations.
    pub times: Vec<u32>,

    /// Route this one runs straight into at its last station.
    #[serde(default)]
    pub continuation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeDto {
    pub station: String,
    pub from: String,
    pub to: String,
    pub min: u32,
    pub max: u32,

    /// Name used by preferences to refer to this change.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferenceDto {
    pub preferred: String,
    pub alternative: String,
}

/// Which point of an interchange window to charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterchangeChoice {
    #[serde(alias = "minimum")]
    Min,
    #[default]
    Midpoint,
    #[serde(alias = "maximum")]
    Max,
}

impl From<InterchangeChoice> for InterchangeEstimate {
    fn from(choice: InterchangeChoice) -> Self {
        match choice {
            InterchangeChoice::Min => InterchangeEstimate::Minimum,
            InterchangeChoice::Midpoint => InterchangeEstimate::Midpoint,
            InterchangeChoice::Max => InterchangeEstimate::Maximum,
        }
    }
}

/// Resolver settings carried by the scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverOptions {
    pub interchange: InterchangeChoice,
    pub first_wait: bool,
    pub ride_before_change: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            interchange: InterchangeChoice::default(),
            first_wait: true,
            ride_before_change: true,
        }
    }
}

impl From<&ResolverOptions> for ResolverConfig {
    fn from(options: &ResolverOptions) -> Self {
        ResolverConfig {
            interchange: options.interchange.into(),
            first_wait: options.first_wait,
            ride_before_change: options.ride_before_change,
        }
    }
}

/// What the report covers and how it is introduced.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportDto {
    pub title: String,

    /// Lines of prose printed under the title.
    #[serde(default)]
    pub introduction: Vec<String>,

    pub starts: Vec<String>,

    pub ends: Vec<String>,

    /// Default output file, relative to the working directory.
    #[serde(default)]
    pub output: Option<String>,

    /// Last line of the document.
    #[serde(default)]
    pub closing: Option<String>,
}
