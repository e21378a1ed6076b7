//! Journey time helpers.
//!
//! Journey times are modelled as `chrono::Duration` so that fractional waits
//! (e.g. 7.5 minutes for a 4tph service) add up exactly. Route and interchange
//! data is always whole minutes.

use chrono::Duration;

/// Converts a whole number of minutes to a `Duration`.
pub fn minutes(mins: u32) -> Duration {
    Duration::minutes(i64::from(mins))
}

/// Formats a duration as minutes for reports.
///
/// Whole minutes print as integers; anything else prints with one decimal.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use rail_model::domain::format_minutes;
///
/// assert_eq!(format_minutes(Duration::minutes(1)), "1 min");
/// assert_eq!(format_minutes(Duration::minutes(12)), "12 mins");
/// assert_eq!(format_minutes(Duration::seconds(450)), "7.5 mins");
/// ```
pub fn format_minutes(duration: Duration) -> String {
    match minutes_figure(duration).as_str() {
        "1" => "1 min".to_string(),
        figure => format!("{figure} mins"),
    }
}

/// Formats a duration as a bare minute figure, for tables.
pub fn minutes_figure(duration: Duration) -> String {
    let millis = duration.num_milliseconds();
    if millis % 60_000 == 0 {
        (millis / 60_000).to_string()
    } else {
        format!("{:.1}", millis as f64 / 60_000.0)
    }
}
