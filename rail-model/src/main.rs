use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rail_model::domain::InterchangeEstimate;
use rail_model::planner::Resolver;
use rail_model::report::{self, FailurePolicy, ReportError};
use rail_model::scenario::{Scenario, ScenarioError};

/// Estimate journey times across a scenario network and write a report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Report file; defaults to the scenario's own output name
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Note unresolvable pairs in the report instead of stopping
    #[arg(long)]
    skip_failures: bool,

    /// Override the scenario's interchange estimate
    #[arg(long, value_enum)]
    interchange: Option<Interchange>,

    /// Do not charge a wait for the first train
    #[arg(long)]
    no_first_wait: bool,

    /// Do not echo the report to stdout
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Interchange {
    Min,
    Midpoint,
    Max,
}

impl From<Interchange> for InterchangeEstimate {
    fn from(choice: Interchange) -> Self {
        match choice {
            Interchange::Min => InterchangeEstimate::Minimum,
            Interchange::Midpoint => InterchangeEstimate::Midpoint,
            Interchange::Max => InterchangeEstimate::Maximum,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() -> ExitCode {
    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let scenario = Scenario::from_path(&args.scenario)?;
    let network = scenario.network()?;
    let plan = scenario.report_plan()?;

    let mut config = scenario.resolver_config();
    if let Some(interchange) = args.interchange {
        config.interchange = interchange.into();
    }
    if args.no_first_wait {
        config.first_wait = false;
    }
    info!(
        interchange = ?config.interchange,
        first_wait = config.first_wait,
        starts = plan.starts.len(),
        ends = plan.ends.len(),
        "Resolving report"
    );

    let resolver = Resolver::with_config(&network, config);
    let policy = if args.skip_failures {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    let report = report::generate(&resolver, &plan, policy)?;

    let output = args
        .output
        .clone()
        .or_else(|| scenario.output().map(PathBuf::from))
        .unwrap_or_else(|| args.scenario.with_extension("md"));
    report.write_to(&output)?;

    if !args.quiet {
        print!("{}", report.text());
    }
    Ok(())
}
