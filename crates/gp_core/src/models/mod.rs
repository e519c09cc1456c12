//! Static data model shared by the qualifying and race engines.

pub mod driver;
pub mod event;
pub mod rules;
pub mod team;

pub use driver::{
    Discipline, DisciplinePreference, DnfReason, Driver, DriverTrait, DrivingStyle, EntryState,
    TrackPreference,
};
pub use event::{CircuitType, EventContext, RaceEvent, TrackSpeed, TrackTrait, Weather, WeatherOdds};
pub use rules::{rules_for, rules_for_strict, PlayoffBonus, PlayoffConfig, PointsSystem, SeriesRules};
pub use team::{CrewTier, Team, TeamCharacteristic, TeamStatus};
