//! Scenario files.
//!
//! A scenario is a JSON document holding one hypothetical network (stations,
//! routes, changes and preferences between changes), the resolver settings
//! to analyse it with, and the list of journeys to report on.

mod error;
mod types;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::domain::{Change, ChangeId, Route, RouteId, Station, StationCode};
use crate::network::{Network, NetworkBuilder};
use crate::planner::ResolverConfig;
use crate::report::ReportPlan;

pub use error::ScenarioError;
pub use types::{
    ChangeDto, InterchangeChoice, PreferenceDto, ReportDto, ResolverOptions, RouteDto, Scenario,
    StationDto,
};

impl Scenario {
    /// Load a scenario from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Scenario = json.parse()?;
        debug!(
            path = %path.display(),
            stations = scenario.stations.len(),
            routes = scenario.routes.len(),
            changes = scenario.changes.len(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Register everything in the scenario and freeze the network.
    ///
    /// Stations go first, then routes, then changes, then preferences, so
    /// each registration only depends on earlier ones. Continuations may
    /// name routes declared later in the file.
    pub fn network(&self) -> Result<Network, ScenarioError> {
        let mut builder = NetworkBuilder::new();

        for station in &self.stations {
            builder.add_station(Station::new(
                StationCode::parse(&station.code)?,
                station.name.clone(),
            ))?;
        }

        for dto in &self.routes {
            let stations = dto
                .stations
                .iter()
                .map(|code| StationCode::parse(code))
                .collect::<Result<Vec<_>, _>>()?;
            let mut route = Route::new(
                RouteId::new(dto.id.clone()),
                dto.name.clone(),
                dto.frequency,
                stations,
                dto.times.clone(),
            )?;
            if let Some(next) = &dto.continuation {
                route = route.with_continuation(RouteId::new(next.clone()));
            }
            builder.add_route(route)?;
        }

        let mut labels: HashMap<&str, ChangeId> = HashMap::new();
        for dto in &self.changes {
            let mut change = Change::new(
                StationCode::parse(&dto.station)?,
                RouteId::new(dto.from.clone()),
                RouteId::new(dto.to.clone()),
                dto.min,
                dto.max,
            )?;
            if let Some(label) = &dto.label {
                if labels.contains_key(label.as_str()) {
                    return Err(ScenarioError::DuplicateChangeLabel(label.clone()));
                }
                change = change.with_label(label.clone());
            }
            let id = builder.add_change(change)?;
            if let Some(label) = &dto.label {
                labels.insert(label.as_str(), id);
            }
        }

        let lookup = |label: &str| {
            labels
                .get(label)
                .copied()
                .ok_or_else(|| ScenarioError::UnknownChangeLabel(label.to_string()))
        };
        for preference in &self.preferences {
            builder.add_preferred_change(
                lookup(preference.preferred.as_str())?,
                lookup(preference.alternative.as_str())?,
            )?;
        }

        Ok(builder.build()?)
    }

    /// Resolver settings declared by the scenario.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::from(&self.resolver)
    }

    /// The journeys to report on, with their station codes checked.
    pub fn report_plan(&self) -> Result<ReportPlan, ScenarioError> {
        let codes = |list: &[String]| {
            list.iter()
                .map(|code| StationCode::parse(code))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(ReportPlan {
            title: self.report.title.clone(),
            introduction: self.report.introduction.clone(),
            starts: codes(&self.report.starts)?,
            ends: codes(&self.report.ends)?,
            closing: self.report.closing.clone(),
        })
    }

    /// Output file named by the scenario, if any.
    pub fn output(&self) -> Option<&Path> {
        self.report.output.as_deref().map(Path::new)
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
