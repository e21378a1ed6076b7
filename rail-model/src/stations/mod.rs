//! Station registry: code to station lookup.

mod registry;

pub use registry::StationRegistry;
