//! Team roster data: car attributes, personnel tiers, entry status.

use super::driver::{Driver, DrivingStyle};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Five-step quality ladder for engineer, pit crew and strategist.
/// Every tier maps to a probability/multiplier band at its call site;
/// the ordering itself is the contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CrewTier {
    Terrible,
    Poor,
    #[default]
    Fair,
    Great,
    Excellent,
}

impl CrewTier {
    pub fn all() -> &'static [CrewTier] {
        &[
            CrewTier::Terrible,
            CrewTier::Poor,
            CrewTier::Fair,
            CrewTier::Great,
            CrewTier::Excellent,
        ]
    }

    /// Chance that a practice session lands a real setup gain instead
    /// of churn.
    pub fn practice_gain_chance(&self) -> f64 {
        match self {
            CrewTier::Terrible => 0.5,
            CrewTier::Poor => 0.6,
            CrewTier::Fair => 0.7,
            CrewTier::Great => 0.8,
            CrewTier::Excellent => 0.9,
        }
    }

    /// Additive knowledge gained from a productive practice session.
    pub fn practice_gain_range(&self) -> (f64, f64) {
        match self {
            CrewTier::Terrible => (0.025, 0.125),
            CrewTier::Poor => (0.05, 0.15),
            CrewTier::Fair => (0.075, 0.175),
            CrewTier::Great => (0.1, 0.2),
            CrewTier::Excellent => (0.15, 0.25),
        }
    }

    /// Pit stop quality band, applied on top of the 0.5 base service
    /// multiplier.
    pub fn pit_speed_range(&self) -> (f64, f64) {
        match self {
            CrewTier::Terrible => (0.875, 0.925),
            CrewTier::Poor => (0.9, 0.95),
            CrewTier::Fair => (0.925, 0.975),
            CrewTier::Great => (0.95, 1.0),
            CrewTier::Excellent => (0.975, 1.025),
        }
    }

    pub fn pit_mistake_chance(&self) -> f64 {
        match self {
            CrewTier::Terrible => 0.075,
            CrewTier::Poor => 0.06,
            CrewTier::Fair => 0.045,
            CrewTier::Great => 0.03,
            CrewTier::Excellent => 0.015,
        }
    }

    /// How the strategist shifts the fantastic/shocking chances.
    /// Returns (fantastic band, shocking band); `Fair` is neutral.
    pub fn form_swing(&self) -> Option<((f64, f64), (f64, f64))> {
        match self {
            CrewTier::Terrible => Some(((0.875, 0.925), (1.075, 1.125))),
            CrewTier::Poor => Some(((0.925, 0.975), (1.025, 1.075))),
            CrewTier::Fair => None,
            CrewTier::Great => Some(((1.025, 1.075), (0.925, 0.975))),
            CrewTier::Excellent => Some(((1.075, 1.125), (0.875, 0.925))),
        }
    }
}

/// Entry status tags. Each gates participation probabilistically in
/// qualifying, or changes retirement behavior during the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamStatus {
    /// May not show up at all; worsens with missed races.
    Insecure,
    /// Part-time program, skips most non-premier rounds.
    Limited,
    /// One-off entries.
    Guest,
    /// Full-season program that prioritizes premier events.
    Premier,
    /// Qualifies, runs a handful of laps, parks the car.
    #[serde(rename = "Start/Park")]
    StartAndPark,
    /// Experimental program; volatile form.
    #[serde(rename = "R/D")]
    ResearchAndDevelopment,
}

/// Track-type specialization a whole team can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamCharacteristic {
    StreetTrackSpecialist,
    ShortTrackSpecialist,
    MileOvalSpecialist,
    SpeedwaySpecialist,
    SuperspeedwaySpecialist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Guaranteed grid entry, regardless of qualifying result.
    pub charter: bool,
    #[serde(default)]
    pub status: HashSet<TeamStatus>,
    #[serde(default)]
    pub characteristics: HashSet<TeamCharacteristic>,
    pub design: DrivingStyle,
    /// 0-100 scale car attributes.
    pub performance: f64,
    pub aero: f64,
    pub gearbox: f64,
    pub suspension: f64,
    pub brakes: f64,
    pub power: f64,
    /// 0-1 scale.
    pub reliability: f64,
    /// 0-1 scale.
    pub engine_reliability: f64,
    /// 0-1 accumulated equipment wear over the season.
    #[serde(default)]
    pub wear: f64,
    pub engineer: CrewTier,
    pub pitcrew: CrewTier,
    pub strategist: CrewTier,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub sponsor: String,
    pub drivers: Vec<Driver>,
}

impl Team {
    pub fn has_status(&self, s: TeamStatus) -> bool {
        self.status.contains(&s)
    }

    pub fn has_characteristic(&self, c: TeamCharacteristic) -> bool {
        self.characteristics.contains(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crew_tier_ladder_is_ordered() {
        assert!(CrewTier::Terrible < CrewTier::Poor);
        assert!(CrewTier::Great < CrewTier::Excellent);
        // Better crews make fewer pit mistakes and gain more in
        // practice.
        for pair in CrewTier::all().windows(2) {
            assert!(pair[0].pit_mistake_chance() > pair[1].pit_mistake_chance());
            assert!(pair[0].practice_gain_chance() < pair[1].practice_gain_chance());
        }
    }

    #[test]
    fn fair_strategist_is_form_neutral() {
        assert!(CrewTier::Fair.form_swing().is_none());
        let ((f_lo, _), (s_lo, _)) = CrewTier::Excellent.form_swing().unwrap();
        assert!(f_lo > 1.0);
        assert!(s_lo < 1.0);
    }

    #[test]
    fn status_tags_serialize_with_roster_spelling() {
        let json = serde_json::to_string(&TeamStatus::StartAndPark).unwrap();
        assert_eq!(json, "\"Start/Park\"");
        let json = serde_json::to_string(&TeamStatus::ResearchAndDevelopment).unwrap();
        assert_eq!(json, "\"R/D\"");
    }
}
