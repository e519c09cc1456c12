//! Championship standings: per-event aggregation, entrant rollups,
//! and the playoff reset.

use crate::engine::stats::RaceRecord;
use crate::error::Result;
use crate::models::{Discipline, PlayoffBonus, SeriesRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DriverStanding {
    pub driver: String,
    pub team: String,
    pub points: u32,
    pub wins: u32,
    pub podiums: u32,
    pub top5s: u32,
    pub top10s: u32,
    pub poles: u32,
    pub dnfs: u32,
    pub races: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntrantStanding {
    pub team: String,
    pub points: u32,
    pub wins: u32,
    pub poles: u32,
    pub dnfs: u32,
    pub races: u32,
}

/// The season table. An owned value: every run builds its own and
/// folds event records into it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Standings {
    pub series: String,
    pub drivers: BTreeMap<String, DriverStanding>,
    pub entrants: BTreeMap<String, EntrantStanding>,
    pub races_completed: u32,
    pub playoff_reset_done: bool,
}

impl Standings {
    pub fn new(series: &str) -> Self {
        Standings {
            series: series.to_string(),
            ..Standings::default()
        }
    }

    fn driver_entry(&mut self, driver: &str, team: &str) -> &mut DriverStanding {
        let entry = self.drivers.entry(driver.to_string()).or_default();
        entry.driver = driver.to_string();
        entry.team = team.to_string();
        entry
    }

    fn entrant_entry(&mut self, team: &str) -> &mut EntrantStanding {
        let entry = self.entrants.entry(team.to_string()).or_default();
        entry.team = team.to_string();
        entry
    }

    /// Fold one event into the table. Finishers take the series table
    /// by position; DNF cars are classified after the last finisher
    /// with continuing positions, which still pays in series whose
    /// table runs the full field.
    pub fn apply_points(&mut self, rules: &SeriesRules, record: &RaceRecord, discipline: Discipline) {
        let stock_car = discipline == Discipline::StockCar;

        if let Some(pole) = record.pole_sitter() {
            let pole = pole.to_string();
            if let Some(team) = record
                .qualifying
                .first()
                .map(|row| row.team.clone())
            {
                let entry = self.driver_entry(&pole, &team);
                entry.poles += 1;
                entry.points += rules.points.pole_bonus;
                let entrant = self.entrant_entry(&team);
                entrant.poles += 1;
                entrant.points += rules.points.pole_bonus;
            }
        }

        for finisher in &record.finishers {
            let points = rules.points.award(finisher.position);
            let entry = self.driver_entry(&finisher.driver, &finisher.team);
            entry.points += points;
            entry.races += 1;
            if finisher.position == 1 {
                entry.wins += 1;
            }
            if stock_car {
                if finisher.position <= 5 {
                    entry.top5s += 1;
                }
                if finisher.position <= 10 {
                    entry.top10s += 1;
                }
            } else if finisher.position <= 3 {
                entry.podiums += 1;
            }

            let entrant = self.entrant_entry(&finisher.team);
            entrant.points += points;
            entrant.races += 1;
            if finisher.position == 1 {
                entrant.wins += 1;
            }
        }

        let mut position = record.finishers.len();
        for dnf in &record.dnfs {
            position += 1;
            let points = rules.points.award(position);
            let entry = self.driver_entry(&dnf.driver, &dnf.team);
            entry.points += points;
            entry.races += 1;
            entry.dnfs += 1;
            let entrant = self.entrant_entry(&dnf.team);
            entrant.points += points;
            entrant.races += 1;
            entrant.dnfs += 1;
        }

        if let Some((driver, _)) = &record.fastest_lap {
            if rules.points.fastest_lap_bonus > 0 {
                if let Some(entry) = self.drivers.get_mut(driver) {
                    entry.points += rules.points.fastest_lap_bonus;
                }
            }
        }
        if let Some((driver, _)) = &record.most_laps_led {
            if rules.points.lap_led_bonus > 0 {
                if let Some(entry) = self.drivers.get_mut(driver) {
                    entry.points += rules.points.lap_led_bonus;
                }
            }
        }

        self.races_completed += 1;
    }

    /// Drivers in championship order: points, then wins, then name.
    pub fn ranked_drivers(&self) -> Vec<&DriverStanding> {
        let mut ranked: Vec<&DriverStanding> = self.drivers.values().collect();
        ranked.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.wins.cmp(&a.wins))
                .then(a.driver.cmp(&b.driver))
        });
        ranked
    }

    pub fn ranked_entrants(&self) -> Vec<&EntrantStanding> {
        let mut ranked: Vec<&EntrantStanding> = self.entrants.values().collect();
        ranked.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.wins.cmp(&a.wins))
                .then(a.team.cmp(&b.team))
        });
        ranked
    }

    /// Apply the playoff reset if this series has one and the regular
    /// season just ended. Fires exactly once, on strict equality with
    /// the configured cutoff; everyone outside the playoff field is
    /// dropped from the table for good. Returns whether it fired.
    pub fn reset_for_playoffs(&mut self, rules: &SeriesRules, season_length: u32) -> Result<bool> {
        let Some(config) = &rules.playoffs else {
            return Ok(false);
        };
        config.validate(season_length)?;
        if self.playoff_reset_done || self.races_completed != config.regular_season_races {
            return Ok(false);
        }

        let field: Vec<(String, u32)> = self
            .ranked_drivers()
            .into_iter()
            .take(config.field_size)
            .map(|d| (d.driver.clone(), d.wins))
            .collect();
        log::info!(
            "{}: playoff field set after {} races ({} drivers)",
            self.series,
            self.races_completed,
            field.len()
        );

        let qualified: Vec<String> = field.iter().map(|(name, _)| name.clone()).collect();
        self.drivers.retain(|name, _| qualified.contains(name));

        for (rank, (name, wins)) in field.iter().enumerate() {
            let bonus = match config.bonus {
                PlayoffBonus::PerWin(k) => wins * k,
                PlayoffBonus::ByInvertedRank(k) => (config.field_size as u32 - rank as u32) * k,
            };
            if let Some(entry) = self.drivers.get_mut(name) {
                entry.points = config.reset_base + bonus;
            }
        }
        self.playoff_reset_done = true;
        Ok(true)
    }
}
