//! The event engine: qualifying, both race variants, incidents,
//! wheel-to-wheel racing, and derived stats.
//!
//! Everything is deterministic given the injected RNG; the engine
//! never owns a random source.

pub mod form;
pub mod incidents;
pub mod modifiers;
pub mod overtaking;
pub mod practice;
pub mod qualifying;
pub mod race;
pub mod sort_keys;
pub mod stats;
pub mod stint_loop;
pub mod strategy;
pub mod weather;


use crate::error::Result;
use crate::models::{Discipline, EventContext, RaceEvent, SeriesRules, Team};
use qualifying::{assemble_grid, qualify_team, QualEntry};
use race::{run_race_single, RaceEntry, RaceOutcome};
use rand::Rng;
use sort_keys::race_order;
use stats::{
    fastest_lap_time, laps_led, qualifying_lap_time, race_time, DnfRecord, FinisherRecord,
    QualRow, RaceRecord,
};
use std::collections::HashMap;
use stint_loop::StintSimulation;

fn qual_row(entry: &QualEntry, base_time: f64) -> QualRow {
    QualRow {
        driver: entry.driver.clone(),
        team: entry.team.clone(),
        supplier: entry.supplier.clone(),
        sponsor: entry.sponsor.clone(),
        time: qualifying_lap_time(base_time, entry.score),
        score: entry.score,
    }
}

/// Run one complete event: practice and qualifying for every entered
/// car, grid assembly, the race in the discipline's variant, and the
/// derived stats. Returns the full event record.
///
/// `missed_races` carries, per team name, how many rounds that team
/// has already sat out this season; it feeds the insecure-entry gate.
pub fn run_event(
    teams: &[Team],
    event: &RaceEvent,
    rules: &SeriesRules,
    discipline: Discipline,
    season_length: u32,
    missed_races: &HashMap<String, u32>,
    rng: &mut impl Rng,
) -> Result<RaceRecord> {
    let weather = weather::sample_weather(&event.odds, rng);
    let ctx = EventContext {
        event,
        weather,
        discipline,
        rules,
        season_length,
    };
    log::debug!("{} round {}: {:?}", event.circuit, event.round, weather);

    let mut lookup = HashMap::new();
    let mut entries = Vec::new();
    for team in teams {
        for driver in &team.drivers {
            lookup.insert(driver.name.as_str(), (team, driver));
        }
        let missed = missed_races.get(&team.name).copied().unwrap_or(0);
        entries.extend(qualify_team(team, &ctx, missed, rng));
    }
    let partition = assemble_grid(entries, event.grid_size)?;

    let qualifying: Vec<QualRow> = partition
        .grid
        .iter()
        .map(|e| qual_row(e, event.base_time))
        .collect();
    let dnq: Vec<QualRow> = partition
        .dnq
        .iter()
        .map(|e| qual_row(e, event.base_time))
        .collect();

    let mut starters: Vec<RaceEntry> = Vec::with_capacity(partition.grid.len());
    for (idx, qual) in partition.grid.iter().enumerate() {
        let (team, driver) = lookup[qual.driver.as_str()];
        starters.push(RaceEntry {
            driver,
            team,
            grid_pos: idx + 1,
            state: qual.state.clone(),
        });
    }

    // Ranked field: (driver, team, supplier, sponsor, grid position,
    // outcome), finished cars first.
    let ranked: Vec<(String, String, String, String, usize, RaceOutcome)> = match discipline {
        Discipline::OpenWheel | Discipline::Endurance => {
            let sim = StintSimulation::new(starters, &ctx);
            sim.run(&ctx, rng)
                .into_iter()
                .map(|e| {
                    (
                        e.driver.name.clone(),
                        e.team.name.clone(),
                        e.team.supplier.clone(),
                        e.team.sponsor.clone(),
                        e.grid_pos,
                        e.outcome,
                    )
                })
                .collect()
        }
        Discipline::StockCar | Discipline::Touring => {
            let outcomes = run_race_single(&mut starters, &ctx, rng);
            let mut field: Vec<_> = starters
                .iter()
                .zip(outcomes)
                .map(|(e, o)| {
                    (
                        e.driver.name.clone(),
                        e.team.name.clone(),
                        e.team.supplier.clone(),
                        e.team.sponsor.clone(),
                        e.grid_pos,
                        o,
                    )
                })
                .collect();
            field.sort_by(|a, b| race_order(&a.5, &b.5));
            field
        }
    };

    let finisher_count = ranked.iter().filter(|r| r.5.is_finished()).count();
    let mut finishers = Vec::new();
    let mut dnfs = Vec::new();
    for (driver, team, supplier, sponsor, grid_pos, outcome) in ranked {
        match outcome {
            RaceOutcome::Finished(score) => {
                let position = finishers.len() + 1;
                // 0.0 for the winner, 1.0 for the last finisher.
                let position_factor = if finisher_count > 1 {
                    (position as f64 - 1.0) / (finisher_count as f64 - 1.0)
                } else {
                    0.0
                };
                finishers.push(FinisherRecord {
                    position,
                    driver,
                    team,
                    supplier,
                    sponsor,
                    grid_pos,
                    score,
                    time: race_time(event.base_time, score, event.laps),
                    fastest_lap: fastest_lap_time(
                        event.base_time,
                        score,
                        position_factor,
                        rng,
                    ),
                    laps_led: laps_led(event.laps, score, position_factor, rng),
                });
            }
            RaceOutcome::Out(reason) => dnfs.push(DnfRecord {
                driver,
                team,
                supplier,
                sponsor,
                reason,
            }),
        }
    }

    let mut record = RaceRecord {
        series: rules.name.clone(),
        circuit: event.circuit.clone(),
        round: event.round,
        qualifying,
        dnq,
        finishers,
        dnfs,
        fastest_lap: None,
        most_laps_led: None,
        most_positions_gained: None,
    };
    record.derive_headlines();
    Ok(record)
}
