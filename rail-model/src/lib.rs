//! Rail network journey time model.
//!
//! Answers "how long does it take to get from A to B" across a hypothetical
//! rail network, and explains the chosen journey. Used to compare what-if
//! network layouts by reporting on many station pairs at once.

pub mod domain;
pub mod network;
pub mod planner;
pub mod report;
pub mod scenario;
pub mod stations;
