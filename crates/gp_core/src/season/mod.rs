//! Season-level aggregation over event records.

pub mod standings;

pub use standings::{DriverStanding, EntrantStanding, Standings};
