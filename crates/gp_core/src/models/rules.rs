//! Series rulebooks: points tables, playoff windows, and the lookup
//! that maps a series name to its rules with a generic fallback.

use crate::error::{Result, SimError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points paid per finishing position, first place first. Positions
/// past the end of the table score zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointsSystem {
    pub table: Vec<u32>,
    /// Points paid to the pole sitter, where the series awards them.
    #[serde(default)]
    pub pole_bonus: u32,
    /// Points added for leading at least one lap, where the series
    /// awards them.
    #[serde(default)]
    pub lap_led_bonus: u32,
    /// Points added for the fastest lap of the race.
    #[serde(default)]
    pub fastest_lap_bonus: u32,
}

impl PointsSystem {
    pub fn award(&self, position: usize) -> u32 {
        if position == 0 {
            return 0;
        }
        self.table.get(position - 1).copied().unwrap_or(0)
    }
}

impl Default for PointsSystem {
    fn default() -> Self {
        PointsSystem {
            table: vec![25, 18, 15, 12, 10, 8, 6, 4, 2, 1],
            pole_bonus: 0,
            lap_led_bonus: 0,
            fastest_lap_bonus: 0,
        }
    }
}

/// How the playoff reset seeds bonus points on top of the base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum PlayoffBonus {
    /// `k` points per regular-season win.
    PerWin(u32),
    /// `k * (field_size - rank + 1)` by regular-season rank.
    ByInvertedRank(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayoffConfig {
    /// Round after which the reset fires. Strict equality: the reset
    /// happens exactly when this many races are complete, once.
    pub regular_season_races: u32,
    pub field_size: usize,
    pub reset_base: u32,
    pub bonus: PlayoffBonus,
}

impl PlayoffConfig {
    pub fn validate(&self, season_length: u32) -> Result<()> {
        if self.regular_season_races == 0 || self.regular_season_races >= season_length {
            return Err(SimError::InvalidConfig(format!(
                "playoff cutoff {} outside season of {} races",
                self.regular_season_races, season_length
            )));
        }
        if self.field_size == 0 {
            return Err(SimError::InvalidConfig(
                "playoff field size must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn default_practice_sessions() -> u32 {
    3
}

fn default_retirement_threshold() -> f64 {
    0.525
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRules {
    pub name: String,
    pub points: PointsSystem,
    #[serde(default)]
    pub playoffs: Option<PlayoffConfig>,
    /// Practice rounds every entry runs before its qualifying lap.
    #[serde(default = "default_practice_sessions")]
    pub practice_sessions: u32,
    /// Second gate of the single-shot mechanical retirement roll.
    #[serde(default = "default_retirement_threshold")]
    pub retirement_threshold: f64,
    #[serde(default)]
    pub premier_series: bool,
}

static RULEBOOKS: Lazy<HashMap<&'static str, SeriesRules>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "World Grand Prix Championship",
        SeriesRules {
            name: "World Grand Prix Championship".into(),
            points: PointsSystem {
                pole_bonus: 1,
                fastest_lap_bonus: 1,
                ..PointsSystem::default()
            },
            playoffs: None,
            practice_sessions: 3,
            retirement_threshold: 0.525,
            premier_series: true,
        },
    );
    m.insert(
        "National Stock Car Cup",
        SeriesRules {
            name: "National Stock Car Cup".into(),
            points: PointsSystem {
                table: vec![
                    40, 35, 34, 33, 32, 31, 30, 29, 28, 27, 26, 25, 24, 23, 22, 21, 20, 19, 18,
                    17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1,
                ],
                pole_bonus: 1,
                lap_led_bonus: 1,
                fastest_lap_bonus: 0,
            },
            playoffs: Some(PlayoffConfig {
                regular_season_races: 25,
                field_size: 12,
                reset_base: 5000,
                bonus: PlayoffBonus::PerWin(10),
            }),
            practice_sessions: 2,
            retirement_threshold: 0.525,
            premier_series: true,
        },
    );
    m.insert(
        "Continental Touring Series",
        SeriesRules {
            name: "Continental Touring Series".into(),
            points: PointsSystem {
                table: vec![20, 17, 15, 13, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
                pole_bonus: 2,
                lap_led_bonus: 0,
                fastest_lap_bonus: 1,
            },
            playoffs: Some(PlayoffConfig {
                regular_season_races: 17,
                field_size: 10,
                reset_base: 4000,
                bonus: PlayoffBonus::ByInvertedRank(10),
            }),
            practice_sessions: 2,
            retirement_threshold: 0.525,
            premier_series: false,
        },
    );
    m
});

static FALLBACK: Lazy<SeriesRules> = Lazy::new(|| SeriesRules {
    name: "Other Series".into(),
    points: PointsSystem::default(),
    playoffs: None,
    practice_sessions: 3,
    retirement_threshold: 0.525,
    premier_series: false,
});

/// Rules for a named series, or the generic fallback when the name is
/// not a known rulebook.
pub fn rules_for(series: &str) -> &'static SeriesRules {
    RULEBOOKS.get(series).unwrap_or(&FALLBACK)
}

/// Strict lookup for callers that must not silently fall back.
pub fn rules_for_strict(series: &str) -> Result<&'static SeriesRules> {
    RULEBOOKS
        .get(series)
        .ok_or_else(|| SimError::UnknownSeries(series.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_is_zero_past_table_and_for_position_zero() {
        let pts = PointsSystem::default();
        assert_eq!(pts.award(1), 25);
        assert_eq!(pts.award(10), 1);
        assert_eq!(pts.award(11), 0);
        assert_eq!(pts.award(0), 0);
    }

    #[test]
    fn unknown_series_falls_back() {
        let rules = rules_for("Regional Legends Tour");
        assert_eq!(rules.name, "Other Series");
        assert!(rules.playoffs.is_none());
        assert_eq!(rules.practice_sessions, 3);
        assert!(rules_for_strict("Regional Legends Tour").is_err());
    }

    #[test]
    fn rulebooks_carry_their_bonuses_and_session_counts() {
        assert_eq!(rules_for("National Stock Car Cup").points.pole_bonus, 1);
        assert_eq!(rules_for("Continental Touring Series").points.pole_bonus, 2);
        assert_eq!(
            rules_for("World Grand Prix Championship").points.fastest_lap_bonus,
            1
        );
        assert_eq!(rules_for("National Stock Car Cup").practice_sessions, 2);
        // The fallback awards nothing beyond the table.
        assert_eq!(rules_for("Other Series").points.pole_bonus, 0);
    }

    #[test]
    fn stock_car_playoffs_validate() {
        let rules = rules_for("National Stock Car Cup");
        let cfg = rules.playoffs.as_ref().unwrap();
        assert!(cfg.validate(36).is_ok());
        assert!(cfg.validate(25).is_err());
        assert!(cfg.validate(20).is_err());
    }

    #[test]
    fn zero_field_rejected() {
        let cfg = PlayoffConfig {
            regular_season_races: 5,
            field_size: 0,
            reset_base: 1000,
            bonus: PlayoffBonus::PerWin(5),
        };
        assert!(cfg.validate(10).is_err());
    }
}
