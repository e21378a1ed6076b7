//! Journey time reports.
//!
//! A report resolves every start/end pair of a [`ReportPlan`], then renders a
//! totals table, one explanation per pair and a station legend into a single
//! markdown document.

mod templates;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use askama::Template;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::{Journey, Leg, QueryError, StationCode, minutes_figure};
use crate::planner::Resolver;

pub use templates::{ReportTemplate, SectionView, StationView, TotalsRow};

/// What to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub title: String,
    pub introduction: Vec<String>,
    pub starts: Vec<StationCode>,
    pub ends: Vec<StationCode>,
    pub closing: Option<String>,
}

/// What to do when a pair has no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed pair.
    #[default]
    Abort,
    /// Note the failure in the report and carry on.
    Skip,
}

/// Errors that can occur while producing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A pair could not be resolved and failures abort the run
    #[error("journey from {from} to {to} failed: {source}")]
    Query {
        from: StationCode,
        to: StationCode,
        #[source]
        source: QueryError,
    },

    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Report could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A pair that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    pub from: StationCode,
    pub to: StationCode,
    pub error: QueryError,
}

/// A rendered report.
#[derive(Debug, Clone)]
pub struct Report {
    text: String,
    pairs: usize,
    failures: Vec<PairFailure>,
}

impl Report {
    /// The markdown document.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of pairs attempted.
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Pairs skipped under [`FailurePolicy::Skip`], in report order.
    pub fn failures(&self) -> &[PairFailure] {
        &self.failures
    }

    /// Write the document to a file, replacing any existing one.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, &self.text).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = self.text.len(), "Report written");
        Ok(())
    }
}

/// Resolve every pair of `plan` and render the report.
///
/// Pairs are resolved in parallel; the document always lists them in the
/// order the plan gives.
///
/// # Errors
///
/// - [`ReportError::Query`] for the first failed pair, under
///   [`FailurePolicy::Abort`]
/// - [`ReportError::Template`] if rendering fails
pub fn generate(
    resolver: &Resolver<'_>,
    plan: &ReportPlan,
    policy: FailurePolicy,
) -> Result<Report, ReportError> {
    let pairs: Vec<(StationCode, StationCode)> = plan
        .starts
        .iter()
        .flat_map(|&start| plan.ends.iter().map(move |&end| (start, end)))
        .collect();

    let results: Vec<Result<Journey, QueryError>> = pairs
        .par_iter()
        .map(|&(start, end)| resolver.resolve(start, end))
        .collect();

    let mut failures = Vec::new();
    for (&(from, to), result) in pairs.iter().zip(&results) {
        if let Err(error) = result {
            if policy == FailurePolicy::Abort {
                return Err(ReportError::Query {
                    from,
                    to,
                    source: error.clone(),
                });
            }
            warn!(%from, %to, %error, "Skipping pair");
            failures.push(PairFailure {
                from,
                to,
                error: error.clone(),
            });
        }
    }

    let describe = |code: StationCode| {
        resolver
            .network()
            .station(&code)
            .map_or_else(|| code.to_string(), ToString::to_string)
    };

    let width = plan.ends.len().max(1);
    let mut rows = Vec::with_capacity(plan.starts.len());
    let mut sections = Vec::with_capacity(plan.starts.len());
    for (start, chunk) in plan.starts.iter().zip(results.chunks(width)) {
        let cells = chunk
            .iter()
            .map(|result| match result {
                Ok(journey) => minutes_figure(journey.total()),
                Err(_) => "-".to_string(),
            })
            .collect();
        rows.push(TotalsRow {
            start: start.to_string(),
            cells,
        });

        let entries = plan
            .ends
            .iter()
            .zip(chunk)
            .map(|(&end, result)| match result {
                Ok(journey) => journey.to_string(),
                Err(error) => format!(
                    "From {} to {}\n- No journey: {error}",
                    describe(*start),
                    describe(end)
                ),
            })
            .collect();
        sections.push(SectionView { entries });
    }

    let template = ReportTemplate {
        underline: ReportTemplate::underline_for(&plan.title),
        title: plan.title.clone(),
        introduction: plan.introduction.clone(),
        first_wait: resolver.config().first_wait,
        convention: templates::convention_text(resolver.config().interchange),
        ends: plan.ends.iter().map(ToString::to_string).collect(),
        rows,
        sections,
        stations: legend(resolver, plan, &results),
        closing: plan.closing.clone().unwrap_or_default(),
    };

    let mut text = template.render()?;
    if !text.ends_with('\n') {
        text.push('\n');
    }

    info!(
        pairs = pairs.len(),
        failed = failures.len(),
        "Report generated"
    );

    Ok(Report {
        text,
        pairs: pairs.len(),
        failures,
    })
}

/// Every registered station the report mentions, by code.
fn legend(
    resolver: &Resolver<'_>,
    plan: &ReportPlan,
    results: &[Result<Journey, QueryError>],
) -> Vec<StationView> {
    let mut codes: Vec<StationCode> = plan.starts.iter().chain(&plan.ends).copied().collect();
    for journey in results.iter().flatten() {
        for leg in journey.legs() {
            match leg {
                Leg::Ride { from, to, .. } => codes.extend([from.code, to.code]),
                Leg::Change { station, .. } => codes.push(station.code),
                Leg::Wait { .. } => {}
            }
        }
    }

    let network = resolver.network();
    codes
        .into_iter()
        .filter_map(|code| network.station(&code))
        .map(|station| (station.code, station.name.clone()))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(code, name)| StationView {
            code: code.to_string(),
            name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Change, Route, RouteId, Station};
    use crate::network::{Network, NetworkBuilder};

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    /// A: X -> Y, B: Y -> Z, change at Y. W is registered but unserved.
    fn network() -> Network {
        let mut builder = NetworkBuilder::new();
        for (c, name) in [("X", "Exton"), ("Y", "Wyeford"), ("Z", "Zedbury"), ("W", "Westholm")] {
            builder.add_station(Station::new(code(c), name)).unwrap();
        }
        builder
            .add_route(Route::new(RouteId::new("A"), "A", 6, vec![code("X"), code("Y")], vec![5]).unwrap())
            .unwrap();
        builder
            .add_route(Route::new(RouteId::new("B"), "B", 6, vec![code("Y"), code("Z")], vec![4]).unwrap())
            .unwrap();
        builder
            .add_change(Change::new(code("Y"), RouteId::new("A"), RouteId::new("B"), 2, 4).unwrap())
            .unwrap();
        builder.build().unwrap()
    }

    fn plan(ends: &[&str]) -> ReportPlan {
        ReportPlan {
            title: "Test model".to_string(),
            introduction: vec!["A small test network.".to_string()],
            starts: vec![code("X"), code("Y")],
            ends: ends.iter().map(|s| code(s)).collect(),
            closing: Some("Corrections welcome.".to_string()),
        }
    }

    #[test]
    fn totals_table_in_plan_order() {
        let network = network();
        let resolver = Resolver::new(&network);

        let report = generate(&resolver, &plan(&["Z", "Y"]), FailurePolicy::Abort).unwrap();

        assert_eq!(report.pairs(), 4);
        assert!(report.failures().is_empty());
        assert!(report.text().contains("| From | Z | Y |\n"));
        assert!(report.text().contains("| X | 17 | 10 |\n"));
        // Y to Y needs no travel
        assert!(report.text().contains("| Y | 9 | 0 |\n"));
    }

    #[test]
    fn explanations_follow_plan_order() {
        let network = network();
        let resolver = Resolver::new(&network);

        let report = generate(&resolver, &plan(&["Z", "Y"]), FailurePolicy::Abort).unwrap();
        let text = report.text();

        let x_to_z = text.find("From Exton (X) to Zedbury (Z)").unwrap();
        let x_to_y = text.find("From Exton (X) to Wyeford (Y)").unwrap();
        let y_to_z = text.find("From Wyeford (Y) to Zedbury (Z)").unwrap();
        assert!(x_to_z < x_to_y);
        assert!(x_to_y < y_to_z);
        assert!(text.contains("- Change at Wyeford (Y) from A to B: 3 mins"));
    }

    #[test]
    fn legend_lists_mentioned_stations_by_code() {
        let network = network();
        let resolver = Resolver::new(&network);

        let report = generate(&resolver, &plan(&["Z"]), FailurePolicy::Abort).unwrap();
        let text = report.text();

        let legend = &text[text.find("Stations\n--------\n").unwrap()..];
        assert!(legend.contains("* X: Exton\n* Y: Wyeford\n* Z: Zedbury\n"));
        assert!(!legend.contains("Westholm"));
        assert!(text.trim_end().ends_with("Corrections welcome."));
    }

    #[test]
    fn abort_stops_at_first_failure() {
        let network = network();
        let resolver = Resolver::new(&network);

        let err = generate(&resolver, &plan(&["Z", "W"]), FailurePolicy::Abort).unwrap_err();

        match err {
            ReportError::Query { from, to, source } => {
                assert_eq!((from, to), (code("X"), code("W")));
                assert!(matches!(source, QueryError::NoPath { .. }));
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn skip_notes_failures_inline() {
        let network = network();
        let resolver = Resolver::new(&network);

        let report = generate(&resolver, &plan(&["Z", "W"]), FailurePolicy::Skip).unwrap();

        assert_eq!(report.failures().len(), 2);
        assert_eq!(report.failures()[0].to, code("W"));
        assert!(report.text().contains("| X | 17 | - |\n"));
        assert!(report.text().contains(
            "From Exton (X) to Westholm (W)\n- No journey: no path from X to W"
        ));
    }

    #[test]
    fn writes_report_to_file() {
        let network = network();
        let resolver = Resolver::new(&network);
        let report = generate(&resolver, &plan(&["Z"]), FailurePolicy::Abort).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        report.write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, report.text());
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn write_failure_is_reported() {
        let network = network();
        let resolver = Resolver::new(&network);
        let report = generate(&resolver, &plan(&["Z"]), FailurePolicy::Abort).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.md");

        assert!(matches!(
            report.write_to(&path),
            Err(ReportError::Io { .. })
        ));
    }
}
