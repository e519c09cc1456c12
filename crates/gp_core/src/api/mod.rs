//! External data contracts.

pub mod race_json;

pub use race_json::{standings_snapshot, RaceResultJson, StandingsJson};
