//! # gp_core - Deterministic Motorsports Season Simulation Engine
//!
//! This library simulates qualifying sessions, races, and championship
//! seasons for fictional motorsports series from numeric driver and
//! team rosters.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Two race resolution models: single-shot for pack-racing
//!   disciplines and a staged stint loop for strategy disciplines
//! - Championship standings with points tables and playoff resets
//! - Pinned JSON contracts for results and standings snapshots

// Game balance constants live next to the formulas that use them
#![allow(clippy::excessive_precision)]
// Scoring signatures carry the whole event context
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod season;

// Re-export the main entry points
pub use api::{standings_snapshot, RaceResultJson, StandingsJson};
pub use engine::race::RaceOutcome;
pub use engine::run_event;
pub use engine::stats::RaceRecord;
pub use error::{Result, SimError};
pub use season::Standings;
