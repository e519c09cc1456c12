//! External JSON contracts for event results and standings snapshots.
//!
//! Downstream tooling re-parses these files positionally by key name,
//! so every key is pinned with an explicit rename. Field order and
//! spelling here are frozen.

use crate::engine::stats::RaceRecord;
use crate::models::Discipline;
use crate::season::Standings;
use serde::{Deserialize, Serialize};

use crate::engine::stats::format_time;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualifyingRowJson {
    #[serde(rename = "Position")]
    pub position: usize,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Sponsor")]
    pub sponsor: String,
    #[serde(rename = "Time")]
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceRowJson {
    #[serde(rename = "Position")]
    pub position: usize,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Sponsor")]
    pub sponsor: String,
    #[serde(rename = "Time")]
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DnfRowJson {
    #[serde(rename = "Position")]
    pub position: usize,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Sponsor")]
    pub sponsor: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FastestLapJson {
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Time")]
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MostLapsLedJson {
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Laps")]
    pub laps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionsGainedJson {
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Gained")]
    pub gained: i64,
}

/// The full result artifact for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResultJson {
    #[serde(rename = "Series")]
    pub series: String,
    #[serde(rename = "Circuit")]
    pub circuit: String,
    #[serde(rename = "Round")]
    pub round: u32,
    #[serde(rename = "Qualifying Results")]
    pub qualifying: Vec<QualifyingRowJson>,
    #[serde(rename = "DNQ Drivers")]
    pub dnq: Vec<QualifyingRowJson>,
    #[serde(rename = "Race Results")]
    pub race: Vec<RaceRowJson>,
    #[serde(rename = "DNF Drivers")]
    pub dnf: Vec<DnfRowJson>,
    #[serde(rename = "Fastest Lap", skip_serializing_if = "Option::is_none")]
    pub fastest_lap: Option<FastestLapJson>,
    #[serde(rename = "Most Laps Led", skip_serializing_if = "Option::is_none")]
    pub most_laps_led: Option<MostLapsLedJson>,
    #[serde(rename = "Most Positions Gained", skip_serializing_if = "Option::is_none")]
    pub most_positions_gained: Option<PositionsGainedJson>,
}

impl From<&RaceRecord> for RaceResultJson {
    fn from(record: &RaceRecord) -> Self {
        let qualifying = record
            .qualifying
            .iter()
            .enumerate()
            .map(|(i, row)| QualifyingRowJson {
                position: i + 1,
                driver: row.driver.clone(),
                team: row.team.clone(),
                supplier: row.supplier.clone(),
                sponsor: row.sponsor.clone(),
                time: format_time(row.time),
            })
            .collect();
        // DNQ positions continue after the grid.
        let dnq = record
            .dnq
            .iter()
            .enumerate()
            .map(|(i, row)| QualifyingRowJson {
                position: record.qualifying.len() + i + 1,
                driver: row.driver.clone(),
                team: row.team.clone(),
                supplier: row.supplier.clone(),
                sponsor: row.sponsor.clone(),
                time: format_time(row.time),
            })
            .collect();
        let race = record
            .finishers
            .iter()
            .map(|f| RaceRowJson {
                position: f.position,
                driver: f.driver.clone(),
                team: f.team.clone(),
                supplier: f.supplier.clone(),
                sponsor: f.sponsor.clone(),
                time: format_time(f.time),
            })
            .collect();
        let dnf = record
            .dnfs
            .iter()
            .enumerate()
            .map(|(i, d)| DnfRowJson {
                position: record.finishers.len() + i + 1,
                driver: d.driver.clone(),
                team: d.team.clone(),
                supplier: d.supplier.clone(),
                sponsor: d.sponsor.clone(),
                reason: d.reason.as_str().to_string(),
            })
            .collect();
        RaceResultJson {
            series: record.series.clone(),
            circuit: record.circuit.clone(),
            round: record.round,
            qualifying,
            dnq,
            race,
            dnf,
            fastest_lap: record.fastest_lap.as_ref().map(|(driver, time)| FastestLapJson {
                driver: driver.clone(),
                time: format_time(*time),
            }),
            most_laps_led: record.most_laps_led.as_ref().map(|(driver, laps)| {
                MostLapsLedJson {
                    driver: driver.clone(),
                    laps: *laps,
                }
            }),
            most_positions_gained: record.most_positions_gained.as_ref().map(
                |(driver, gained)| PositionsGainedJson {
                    driver: driver.clone(),
                    gained: *gained,
                },
            ),
        }
    }
}

/// One driver row of the standings snapshot. Stock-car series report
/// top-5s and top-10s; everyone else reports podiums. The absent
/// column is omitted rather than zeroed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverStandingJson {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Points")]
    pub points: u32,
    #[serde(rename = "Wins")]
    pub wins: u32,
    #[serde(rename = "Podiums", skip_serializing_if = "Option::is_none")]
    pub podiums: Option<u32>,
    #[serde(rename = "Top 5s", skip_serializing_if = "Option::is_none")]
    pub top5s: Option<u32>,
    #[serde(rename = "Top 10s", skip_serializing_if = "Option::is_none")]
    pub top10s: Option<u32>,
    #[serde(rename = "Poles")]
    pub poles: u32,
    #[serde(rename = "DNFs")]
    pub dnfs: u32,
    #[serde(rename = "Races")]
    pub races: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntrantStandingJson {
    #[serde(rename = "e_Rank")]
    pub rank: usize,
    #[serde(rename = "e_Team")]
    pub team: String,
    #[serde(rename = "e_Points")]
    pub points: u32,
    #[serde(rename = "e_Wins")]
    pub wins: u32,
    #[serde(rename = "e_Poles")]
    pub poles: u32,
    #[serde(rename = "e_DNFs")]
    pub dnfs: u32,
    #[serde(rename = "e_Races")]
    pub races: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsJson {
    #[serde(rename = "Series")]
    pub series: String,
    #[serde(rename = "Drivers")]
    pub drivers: Vec<DriverStandingJson>,
    #[serde(rename = "Entrants")]
    pub entrants: Vec<EntrantStandingJson>,
}

/// Snapshot the standings in championship order.
pub fn standings_snapshot(standings: &Standings, discipline: Discipline) -> StandingsJson {
    let stock_car = discipline == Discipline::StockCar;
    let drivers = standings
        .ranked_drivers()
        .into_iter()
        .enumerate()
        .map(|(i, d)| DriverStandingJson {
            rank: i + 1,
            driver: d.driver.clone(),
            team: d.team.clone(),
            points: d.points,
            wins: d.wins,
            podiums: (!stock_car).then_some(d.podiums),
            top5s: stock_car.then_some(d.top5s),
            top10s: stock_car.then_some(d.top10s),
            poles: d.poles,
            dnfs: d.dnfs,
            races: d.races,
        })
        .collect();
    let entrants = standings
        .ranked_entrants()
        .into_iter()
        .enumerate()
        .map(|(i, e)| EntrantStandingJson {
            rank: i + 1,
            team: e.team.clone(),
            points: e.points,
            wins: e.wins,
            poles: e.poles,
            dnfs: e.dnfs,
            races: e.races,
        })
        .collect();
    StandingsJson {
        series: standings.series.clone(),
        drivers,
        entrants,
    }
}
