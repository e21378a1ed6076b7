//! Askama template for the markdown report.

use askama::Template;

use crate::domain::InterchangeEstimate;

/// The whole report document.
#[derive(Template)]
#[template(path = "report.md")]
pub struct ReportTemplate {
    pub title: String,
    pub underline: String,
    pub introduction: Vec<String>,
    pub first_wait: bool,
    /// How a change's window is turned into a cost, as prose.
    pub convention: &'static str,
    /// Column headings of the totals table.
    pub ends: Vec<String>,
    pub rows: Vec<TotalsRow>,
    pub sections: Vec<SectionView>,
    pub stations: Vec<StationView>,
    /// Empty for no closing line.
    pub closing: String,
}

impl ReportTemplate {
    /// Markdown setext underline for a title.
    pub fn underline_for(title: &str) -> String {
        "=".repeat(title.chars().count().max(1))
    }
}

/// One row of the totals table.
#[derive(Debug, Clone)]
pub struct TotalsRow {
    pub start: String,
    /// Total minutes per end, or `-` where no journey was found.
    pub cells: Vec<String>,
}

/// Explanations for every journey from one start.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub entries: Vec<String>,
}

/// Station legend entry.
#[derive(Debug, Clone)]
pub struct StationView {
    pub code: String,
    pub name: String,
}

pub(crate) fn convention_text(estimate: InterchangeEstimate) -> &'static str {
    match estimate {
        InterchangeEstimate::Minimum => "the shortest time in its interchange window",
        InterchangeEstimate::Midpoint => {
            "the middle of its interchange window, rounded up to a whole minute"
        }
        InterchangeEstimate::Maximum => "the longest time in its interchange window",
    }
}
