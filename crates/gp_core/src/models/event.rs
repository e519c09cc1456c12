//! Event descriptors: circuit classes, weather odds, track traits,
//! and the per-event context bundle every scoring function receives.

use super::driver::{Discipline, DriverTrait, TrackPreference};
use super::rules::SeriesRules;
use super::team::TeamCharacteristic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitType {
    #[serde(rename = "Grand Prix")]
    GrandPrix,
    #[serde(rename = "Road Course")]
    RoadCourse,
    #[serde(rename = "Street Track")]
    StreetTrack,
    #[serde(rename = "Short Track")]
    ShortTrack,
    Oval,
    #[serde(rename = "Mile Oval")]
    MileOval,
    Speedway,
    Superspeedway,
}

impl CircuitType {
    pub fn is_road_class(&self) -> bool {
        matches!(
            self,
            CircuitType::GrandPrix | CircuitType::RoadCourse | CircuitType::StreetTrack
        )
    }

    pub fn is_oval_class(&self) -> bool {
        !self.is_road_class()
    }

    /// Preference class a driver needs to avoid the mismatch penalty.
    pub fn preferred_track(&self) -> TrackPreference {
        if self.is_road_class() {
            TrackPreference::Road
        } else {
            TrackPreference::Oval
        }
    }

    /// Driver trait granting the specialist bonus here, if any.
    pub fn specialist_trait(&self) -> Option<DriverTrait> {
        match self {
            CircuitType::StreetTrack => Some(DriverTrait::StreetTrackSpecialist),
            CircuitType::ShortTrack => Some(DriverTrait::ShortTrackSpecialist),
            CircuitType::MileOval => Some(DriverTrait::MileOvalSpecialist),
            CircuitType::Speedway => Some(DriverTrait::SpeedwaySpecialist),
            CircuitType::Superspeedway => Some(DriverTrait::SuperspeedwaySpecialist),
            _ => None,
        }
    }

    /// Team characteristic granting the car-side specialist bonus.
    pub fn specialist_characteristic(&self) -> Option<TeamCharacteristic> {
        match self {
            CircuitType::StreetTrack => Some(TeamCharacteristic::StreetTrackSpecialist),
            CircuitType::ShortTrack => Some(TeamCharacteristic::ShortTrackSpecialist),
            CircuitType::MileOval => Some(TeamCharacteristic::MileOvalSpecialist),
            CircuitType::Speedway => Some(TeamCharacteristic::SpeedwaySpecialist),
            CircuitType::Superspeedway => Some(TeamCharacteristic::SuperspeedwaySpecialist),
            _ => None,
        }
    }

    /// Pack racing widens the session-to-session spread.
    pub fn jitter_scale(&self) -> f64 {
        match self {
            CircuitType::Superspeedway => 1.25,
            CircuitType::Speedway => 1.2,
            CircuitType::MileOval => 1.15,
            CircuitType::ShortTrack => 1.1,
            _ => 1.0,
        }
    }

    /// Additive-score variant: how hard each grid slot back hurts.
    pub fn position_penalty_coeff(&self) -> f64 {
        match self {
            CircuitType::Superspeedway => 4.5,
            CircuitType::Oval => 5.5,
            CircuitType::ShortTrack => 6.5,
            CircuitType::RoadCourse | CircuitType::GrandPrix => 7.0,
            CircuitType::StreetTrack => 8.0,
            _ => 7.0,
        }
    }

    /// Staged variant: per-position divisor growth for the
    /// `1 / (1 + (pos-1)*c)` position factor. Narrow street circuits
    /// make grid position matter most.
    pub fn position_factor_coeff(&self) -> f64 {
        match self {
            CircuitType::Superspeedway => 0.07,
            CircuitType::Speedway => 0.08,
            CircuitType::MileOval => 0.09,
            CircuitType::ShortTrack => 0.11,
            CircuitType::RoadCourse | CircuitType::GrandPrix => 0.15,
            CircuitType::StreetTrack => 0.18,
            _ => 0.13,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackSpeed {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackTrait {
    /// More special events both ways, wider spread.
    Chaotic,
    /// Processional; narrows the spread.
    Tame,
    /// Big occasion, some drivers tighten up.
    Prestigious,
    Windy,
    PoorSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Rainy,
    Overcast,
    Hot,
    Stormy,
}

impl Weather {
    /// Scale applied to the (fantastic, shocking) base chances.
    pub fn form_scale(&self) -> (f64, f64) {
        match self {
            Weather::Clear => (1.0, 1.0),
            Weather::Rainy => (2.5, 2.5),
            Weather::Overcast => (1.0, 0.5),
            Weather::Hot => (0.5, 1.5),
            Weather::Stormy => (5.0, 5.0),
        }
    }

    /// Half-width of the per-car random jitter in a session.
    pub fn jitter_half_width(&self) -> f64 {
        match self {
            Weather::Rainy => 0.15,
            Weather::Stormy => 0.2,
            _ => 0.05,
        }
    }

    /// Weather amplifies or mutes whatever the pit wall calls.
    pub fn strategy_scale(&self) -> f64 {
        match self {
            Weather::Rainy => 1.25,
            Weather::Stormy => 1.5,
            _ => 1.0,
        }
    }
}

/// Chance vector sampled once per event. Values are relative weights,
/// not required to sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct WeatherOdds {
    pub clear: f64,
    pub rainy: f64,
    pub overcast: f64,
    pub hot: f64,
    pub stormy: f64,
}

/// One round of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEvent {
    pub round: u32,
    pub circuit: String,
    pub country: String,
    pub circuit_type: CircuitType,
    pub speed: TrackSpeed,
    pub odds: WeatherOdds,
    #[serde(default)]
    pub characteristics: HashSet<TrackTrait>,
    pub laps: u32,
    /// Base lap time, seconds.
    pub base_time: f64,
    pub grid_size: usize,
    /// 0-1; how punishing the circuit is for weak or green drivers.
    pub difficulty: f64,
    /// Premier events override most participation gating.
    #[serde(default)]
    pub premier: bool,
}

impl RaceEvent {
    pub fn has_trait(&self, t: TrackTrait) -> bool {
        self.characteristics.contains(&t)
    }

    /// Stint count for the staged race loop. `laps * base_time / 750`,
    /// never below one so short club races still run.
    pub fn stints(&self) -> u32 {
        (((self.laps as f64) * self.base_time) / 750.0).floor().max(1.0) as u32
    }
}

/// Everything a scoring call needs to know about the event, bundled so
/// signatures stay stable as the chain grows.
#[derive(Debug, Clone)]
pub struct EventContext<'a> {
    pub event: &'a RaceEvent,
    pub weather: Weather,
    pub discipline: Discipline,
    pub rules: &'a SeriesRules,
    pub season_length: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circuit_classes_partition() {
        for ct in [
            CircuitType::GrandPrix,
            CircuitType::RoadCourse,
            CircuitType::StreetTrack,
            CircuitType::ShortTrack,
            CircuitType::Oval,
            CircuitType::MileOval,
            CircuitType::Speedway,
            CircuitType::Superspeedway,
        ] {
            assert_ne!(ct.is_road_class(), ct.is_oval_class());
        }
    }

    #[test]
    fn street_tracks_punish_grid_position_most() {
        assert!(
            CircuitType::StreetTrack.position_factor_coeff()
                > CircuitType::Superspeedway.position_factor_coeff()
        );
        assert!(
            CircuitType::StreetTrack.position_penalty_coeff()
                > CircuitType::Superspeedway.position_penalty_coeff()
        );
    }

    #[test]
    fn stint_count_never_zero() {
        let event = RaceEvent {
            round: 1,
            circuit: "Test".into(),
            country: "".into(),
            circuit_type: CircuitType::ShortTrack,
            speed: TrackSpeed::Low,
            odds: WeatherOdds::default(),
            characteristics: HashSet::new(),
            laps: 5,
            base_time: 20.0,
            grid_size: 10,
            difficulty: 0.2,
            premier: false,
        };
        assert_eq!(event.stints(), 1);
    }

    #[test]
    fn grand_prix_distance_yields_multiple_stints() {
        let event = RaceEvent {
            round: 1,
            circuit: "Test GP".into(),
            country: "".into(),
            circuit_type: CircuitType::GrandPrix,
            speed: TrackSpeed::Medium,
            odds: WeatherOdds::default(),
            characteristics: HashSet::new(),
            laps: 60,
            base_time: 90.0,
            grid_size: 22,
            difficulty: 0.5,
            premier: true,
        };
        assert_eq!(event.stints(), 7);
    }

    #[test]
    fn circuit_type_serializes_with_schedule_spelling() {
        let json = serde_json::to_string(&CircuitType::GrandPrix).unwrap();
        assert_eq!(json, "\"Grand Prix\"");
    }
}
