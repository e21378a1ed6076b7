//! Domain types for the rail network model.
//!
//! This module contains the core domain model types: stations, routes,
//! changes between routes, and resolved journeys. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod change;
mod error;
mod journey;
mod route;
mod station;
mod time;

pub use change::{
    Change, ChangeId, InterchangeEstimate, InterchangeWindow, PreferredChange,
};
pub use error::{NetworkError, QueryError};
pub use journey::{Journey, Leg};
pub use route::{Corridor, Route, RouteId};
pub use station::{InvalidStationCode, Station, StationCode};
pub use time::{format_minutes, minutes, minutes_figure};
