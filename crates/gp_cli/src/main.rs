//! Season runner CLI
//!
//! Loads CSV rosters and schedules, runs events through gp_core, and
//! writes the JSON result and standings artifacts.

mod render;
mod roster;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gp_core::api::{standings_snapshot, RaceResultJson};
use gp_core::models::{rules_for, Discipline, Team};
use gp_core::{run_event, Standings};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gp_cli")]
#[command(about = "Run simulated motorsports events and seasons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single event from the schedule
    Race {
        /// Teams CSV file
        #[arg(long)]
        teams: PathBuf,

        /// Drivers CSV file
        #[arg(long)]
        drivers: PathBuf,

        /// Schedule CSV file
        #[arg(long)]
        schedule: PathBuf,

        /// Round number to run
        #[arg(long)]
        round: u32,

        /// Series name (rulebook lookup; unknown names use the
        /// generic rules)
        #[arg(long, default_value = "Other Series")]
        series: String,

        /// Discipline: open-wheel, stock-car, touring, endurance
        #[arg(long, default_value = "open-wheel")]
        discipline: String,

        /// RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Output JSON file for the result
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the whole schedule and fold the standings
    Season {
        /// Teams CSV file
        #[arg(long)]
        teams: PathBuf,

        /// Drivers CSV file
        #[arg(long)]
        drivers: PathBuf,

        /// Schedule CSV file
        #[arg(long)]
        schedule: PathBuf,

        /// Series name
        #[arg(long, default_value = "Other Series")]
        series: String,

        /// Discipline: open-wheel, stock-car, touring, endurance
        #[arg(long, default_value = "open-wheel")]
        discipline: String,

        /// RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Directory for per-round result JSON and the standings
        /// snapshot
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn parse_discipline(name: &str) -> Result<Discipline> {
    Ok(match name {
        "open-wheel" => Discipline::OpenWheel,
        "stock-car" => Discipline::StockCar,
        "touring" => Discipline::Touring,
        "endurance" => Discipline::Endurance,
        other => bail!("unknown discipline: {}", other),
    })
}

/// Teams that entered nothing this round missed it; the insecure-entry
/// gate feeds on that count next time.
fn update_missed(
    missed: &mut HashMap<String, u32>,
    teams: &[Team],
    record: &gp_core::RaceRecord,
) {
    for team in teams {
        let entered = record
            .qualifying
            .iter()
            .chain(record.dnq.iter())
            .any(|row| row.team == team.name);
        if !entered {
            *missed.entry(team.name.clone()).or_insert(0) += 1;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Race {
            teams,
            drivers,
            schedule,
            round,
            series,
            discipline,
            seed,
            out,
        } => {
            let discipline = parse_discipline(&discipline)?;
            let roster = roster::load_roster(&teams, &drivers)?;
            let events = roster::load_schedule(&schedule)?;
            let Some(event) = events.iter().find(|e| e.round == round) else {
                bail!("schedule has no round {}", round);
            };
            let rules = rules_for(&series);
            let season_length = events.len() as u32;

            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(round as u64));
            let record = run_event(
                &roster,
                event,
                rules,
                discipline,
                season_length,
                &HashMap::new(),
                &mut rng,
            )?;
            render::print_race(&record);

            if let Some(out) = out {
                let json = RaceResultJson::from(&record);
                std::fs::write(&out, serde_json::to_string_pretty(&json)?)
                    .with_context(|| format!("writing {}", out.display()))?;
                println!();
                println!("Result written to {}", out.display());
            }
        }

        Commands::Season {
            teams,
            drivers,
            schedule,
            series,
            discipline,
            seed,
            out_dir,
        } => {
            let discipline = parse_discipline(&discipline)?;
            let roster = roster::load_roster(&teams, &drivers)?;
            let events = roster::load_schedule(&schedule)?;
            let rules = rules_for(&series);
            let season_length = events.len() as u32;

            if let Some(dir) = &out_dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }

            let mut standings = Standings::new(&rules.name);
            let mut missed: HashMap<String, u32> = HashMap::new();
            for event in &events {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(event.round as u64));
                let record = match run_event(
                    &roster,
                    event,
                    rules,
                    discipline,
                    season_length,
                    &missed,
                    &mut rng,
                ) {
                    Ok(record) => record,
                    Err(err) if err.is_recoverable() => {
                        log::warn!("round {} skipped: {}", event.round, err);
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };
                render::print_race(&record);
                update_missed(&mut missed, &roster, &record);
                standings.apply_points(rules, &record, discipline);
                if standings.reset_for_playoffs(rules, season_length)? {
                    println!();
                    println!("Playoff field set after round {}.", event.round);
                }

                if let Some(dir) = &out_dir {
                    let json = RaceResultJson::from(&record);
                    let path = dir.join(format!("round_{:02}.json", event.round));
                    std::fs::write(&path, serde_json::to_string_pretty(&json)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                }
            }

            let snapshot = standings_snapshot(&standings, discipline);
            render::print_standings(&snapshot);
            if let Some(dir) = &out_dir {
                let path = dir.join("standings.json");
                std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!();
                println!("Standings written to {}", path.display());
            }
        }
    }

    Ok(())
}
