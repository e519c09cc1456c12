//! Driver roster data.
//!
//! A [`Driver`] is built once per season from roster data and never
//! mutated by the engine. Everything that changes during an event
//! (tires, setup, DNF status) lives in [`EntryState`], owned by the
//! running session.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Discipline a driver grew up in. `Any` adapts everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    OpenWheel,
    StockCar,
    Touring,
    Endurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisciplinePreference {
    OpenWheel,
    StockCar,
    Touring,
    Endurance,
    Any,
}

impl DisciplinePreference {
    /// A mismatched discipline costs speed and skill; `Any` never
    /// mismatches.
    pub fn matches(&self, discipline: Discipline) -> bool {
        match self {
            DisciplinePreference::Any => true,
            DisciplinePreference::OpenWheel => discipline == Discipline::OpenWheel,
            DisciplinePreference::StockCar => discipline == Discipline::StockCar,
            DisciplinePreference::Touring => discipline == Discipline::Touring,
            DisciplinePreference::Endurance => discipline == Discipline::Endurance,
        }
    }
}

/// Track layout class a driver prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackPreference {
    Road,
    Oval,
    Both,
}

/// Chassis balance a driver drives best, and the balance a team
/// designs into the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrivingStyle {
    Oversteer,
    Understeer,
    Balanced,
    #[serde(rename = "None")]
    None,
}

/// Closed trait vocabulary. Each trait hooks into exactly one spot in
/// the modifier chain or an incident/overtake roll; unmatched traits
/// are no-ops everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverTrait {
    WetWeatherSpecialist,
    StreetTrackSpecialist,
    ShortTrackSpecialist,
    MileOvalSpecialist,
    SpeedwaySpecialist,
    SuperspeedwaySpecialist,
    PoorAtRoadCourses,
    Adaptive,
    Inconsistent,
    EarlySeasonPeak,
    LateSeasonPeak,
    Overwhelmed,
    Heroic,
    Yielding,
    PoorFromPole,
    GreatFromPole,
    QualifyingSpecialist,
    Strategist,
    GoodInstincts,
    PoorCommunicator,
    Aggressive,
    Cautious,
    GreatOvertaker,
    PoorOvertaker,
    GreatBlocker,
    PoorBlocker,
    GreatInCleanAir,
    PoorInCleanAir,
}

impl DriverTrait {
    pub fn all() -> &'static [DriverTrait] {
        &[
            DriverTrait::WetWeatherSpecialist,
            DriverTrait::StreetTrackSpecialist,
            DriverTrait::ShortTrackSpecialist,
            DriverTrait::MileOvalSpecialist,
            DriverTrait::SpeedwaySpecialist,
            DriverTrait::SuperspeedwaySpecialist,
            DriverTrait::PoorAtRoadCourses,
            DriverTrait::Adaptive,
            DriverTrait::Inconsistent,
            DriverTrait::EarlySeasonPeak,
            DriverTrait::LateSeasonPeak,
            DriverTrait::Overwhelmed,
            DriverTrait::Heroic,
            DriverTrait::Yielding,
            DriverTrait::PoorFromPole,
            DriverTrait::GreatFromPole,
            DriverTrait::QualifyingSpecialist,
            DriverTrait::Strategist,
            DriverTrait::GoodInstincts,
            DriverTrait::PoorCommunicator,
            DriverTrait::Aggressive,
            DriverTrait::Cautious,
            DriverTrait::GreatOvertaker,
            DriverTrait::PoorOvertaker,
            DriverTrait::GreatBlocker,
            DriverTrait::PoorBlocker,
            DriverTrait::GreatInCleanAir,
            DriverTrait::PoorInCleanAir,
        ]
    }

    /// Parse a `|`-separated roster tag list. Unknown tags are skipped
    /// (roster files carry flavor tags the engine does not model).
    pub fn parse_tags(tags: &str) -> HashSet<DriverTrait> {
        tags.split('|')
            .filter_map(|tag| match tag.trim() {
                "WetWeatherSpecialist" => Some(DriverTrait::WetWeatherSpecialist),
                "StreetTrackSpecialist" => Some(DriverTrait::StreetTrackSpecialist),
                "ShortTrackSpecialist" => Some(DriverTrait::ShortTrackSpecialist),
                "MileOvalSpecialist" => Some(DriverTrait::MileOvalSpecialist),
                "SpeedwaySpecialist" => Some(DriverTrait::SpeedwaySpecialist),
                "SuperspeedwaySpecialist" => Some(DriverTrait::SuperspeedwaySpecialist),
                "PoorAtRoadCourses" => Some(DriverTrait::PoorAtRoadCourses),
                "Adaptive" => Some(DriverTrait::Adaptive),
                "Inconsistent" => Some(DriverTrait::Inconsistent),
                "EarlySeasonPeak" => Some(DriverTrait::EarlySeasonPeak),
                "LateSeasonPeak" => Some(DriverTrait::LateSeasonPeak),
                "Overwhelmed" => Some(DriverTrait::Overwhelmed),
                "Heroic" => Some(DriverTrait::Heroic),
                "Yielding" => Some(DriverTrait::Yielding),
                "PoorFromPole" => Some(DriverTrait::PoorFromPole),
                "GreatFromPole" => Some(DriverTrait::GreatFromPole),
                "QualifyingSpecialist" => Some(DriverTrait::QualifyingSpecialist),
                "Strategist" => Some(DriverTrait::Strategist),
                "GoodInstincts" => Some(DriverTrait::GoodInstincts),
                "PoorCommunicator" => Some(DriverTrait::PoorCommunicator),
                "Aggressive" => Some(DriverTrait::Aggressive),
                "Cautious" => Some(DriverTrait::Cautious),
                "GreatOvertaker" => Some(DriverTrait::GreatOvertaker),
                "PoorOvertaker" => Some(DriverTrait::PoorOvertaker),
                "GreatBlocker" => Some(DriverTrait::GreatBlocker),
                "PoorBlocker" => Some(DriverTrait::PoorBlocker),
                "GreatInCleanAir" => Some(DriverTrait::GreatInCleanAir),
                "PoorInCleanAir" => Some(DriverTrait::PoorInCleanAir),
                _ => None,
            })
            .collect()
    }
}

/// Why a driver's race ended. Absorbing: once set for an event it is
/// never cleared or overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnfReason {
    Crash,
    Retirement,
    Collision,
}

impl DnfReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnfReason::Crash => "Crash",
            DnfReason::Retirement => "Retirement",
            DnfReason::Collision => "Collision",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    pub nationality: String,
    /// 0-100 scale.
    pub speed: f64,
    /// 0-100 scale.
    pub skill: f64,
    /// 0-100 scale.
    pub bravery: f64,
    /// 0-1 scale.
    pub fitness: f64,
    /// 0-1 scale.
    pub experience: f64,
    /// 0-1 scale.
    pub morale: f64,
    /// 0-1 scale.
    pub psyche: f64,
    pub preferred_discipline: DisciplinePreference,
    pub preferred_track: TrackPreference,
    pub style: DrivingStyle,
    #[serde(default)]
    pub traits: HashSet<DriverTrait>,
}

impl Driver {
    pub fn has(&self, t: DriverTrait) -> bool {
        self.traits.contains(&t)
    }
}

/// Per-event mutable state for one entry. Created when the session
/// starts; the roster [`Driver`] itself is never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryState {
    /// 1.0 = fresh. Decays every stint; a pit stop under 0.5 resets it.
    pub tire_condition: f64,
    /// 1.0 = full tank.
    pub fuel: f64,
    /// Practice accumulates toward 1.0; starts half-dialed.
    pub chassis_setup: f64,
    /// Driver familiarity with this weekend's car. Same lifecycle as
    /// chassis setup.
    pub readiness: f64,
    pub team_confidence: f64,
    pub dnf: Option<DnfReason>,
}

impl Default for EntryState {
    fn default() -> Self {
        Self {
            tire_condition: 1.0,
            fuel: 1.0,
            chassis_setup: 0.5,
            readiness: 0.5,
            team_confidence: 1.0,
            dnf: None,
        }
    }
}

impl EntryState {
    pub fn is_running(&self) -> bool {
        self.dnf.is_none()
    }

    /// Record a DNF. First cause wins; later causes are ignored so the
    /// reason reported matches the incident that actually ended the
    /// race.
    pub fn retire(&mut self, reason: DnfReason) {
        if self.dnf.is_none() {
            self.dnf = Some(reason);
        }
    }
}
