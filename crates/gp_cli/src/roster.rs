//! CSV roster and schedule loading.
//!
//! Multi-valued columns (statuses, traits, characteristics) are
//! `|`-separated tags; unknown tags are skipped so roster files can
//! carry flavor columns the engine does not model.

use anyhow::{bail, Context, Result};
use gp_core::models::{
    CircuitType, CrewTier, DisciplinePreference, Driver, DriverTrait, DrivingStyle, RaceEvent,
    Team, TeamCharacteristic, TeamStatus, TrackPreference, TrackSpeed, TrackTrait, WeatherOdds,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DriverRow {
    name: String,
    nationality: String,
    team: String,
    speed: f64,
    skill: f64,
    bravery: f64,
    fitness: f64,
    experience: f64,
    morale: f64,
    psyche: f64,
    discipline: DisciplinePreference,
    track: TrackPreference,
    style: DrivingStyle,
    #[serde(default)]
    traits: String,
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    name: String,
    charter: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    characteristics: String,
    design: DrivingStyle,
    performance: f64,
    aero: f64,
    gearbox: f64,
    suspension: f64,
    brakes: f64,
    power: f64,
    reliability: f64,
    engine_reliability: f64,
    #[serde(default)]
    wear: f64,
    engineer: CrewTier,
    pitcrew: CrewTier,
    strategist: CrewTier,
    #[serde(default)]
    supplier: String,
    #[serde(default)]
    sponsor: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    round: u32,
    circuit: String,
    country: String,
    circuit_type: CircuitType,
    speed: TrackSpeed,
    clear: f64,
    rainy: f64,
    overcast: f64,
    hot: f64,
    stormy: f64,
    #[serde(default)]
    characteristics: String,
    laps: u32,
    base_time: f64,
    grid_size: usize,
    difficulty: f64,
    #[serde(default)]
    premier: bool,
}

fn parse_statuses(tags: &str) -> HashSet<TeamStatus> {
    tags.split('|')
        .filter_map(|tag| match tag.trim() {
            "Insecure" => Some(TeamStatus::Insecure),
            "Limited" => Some(TeamStatus::Limited),
            "Guest" => Some(TeamStatus::Guest),
            "Premier" => Some(TeamStatus::Premier),
            "Start/Park" => Some(TeamStatus::StartAndPark),
            "R/D" => Some(TeamStatus::ResearchAndDevelopment),
            _ => None,
        })
        .collect()
}

fn parse_characteristics(tags: &str) -> HashSet<TeamCharacteristic> {
    tags.split('|')
        .filter_map(|tag| match tag.trim() {
            "StreetTrackSpecialist" => Some(TeamCharacteristic::StreetTrackSpecialist),
            "ShortTrackSpecialist" => Some(TeamCharacteristic::ShortTrackSpecialist),
            "MileOvalSpecialist" => Some(TeamCharacteristic::MileOvalSpecialist),
            "SpeedwaySpecialist" => Some(TeamCharacteristic::SpeedwaySpecialist),
            "SuperspeedwaySpecialist" => Some(TeamCharacteristic::SuperspeedwaySpecialist),
            _ => None,
        })
        .collect()
}

fn parse_track_traits(tags: &str) -> HashSet<TrackTrait> {
    tags.split('|')
        .filter_map(|tag| match tag.trim() {
            "Chaotic" => Some(TrackTrait::Chaotic),
            "Tame" => Some(TrackTrait::Tame),
            "Prestigious" => Some(TrackTrait::Prestigious),
            "Windy" => Some(TrackTrait::Windy),
            "PoorSurface" => Some(TrackTrait::PoorSurface),
            _ => None,
        })
        .collect()
}

/// Load teams and their drivers from the two roster files. Every
/// driver row must name an existing team.
pub fn load_roster(teams_path: &Path, drivers_path: &Path) -> Result<Vec<Team>> {
    let mut reader = csv::Reader::from_path(teams_path)
        .with_context(|| format!("reading teams from {}", teams_path.display()))?;
    let mut teams: Vec<Team> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in reader.deserialize() {
        let row: TeamRow = row.context("parsing team row")?;
        index.insert(row.name.clone(), teams.len());
        teams.push(Team {
            name: row.name,
            charter: row.charter,
            status: parse_statuses(&row.status),
            characteristics: parse_characteristics(&row.characteristics),
            design: row.design,
            performance: row.performance,
            aero: row.aero,
            gearbox: row.gearbox,
            suspension: row.suspension,
            brakes: row.brakes,
            power: row.power,
            reliability: row.reliability,
            engine_reliability: row.engine_reliability,
            wear: row.wear,
            engineer: row.engineer,
            pitcrew: row.pitcrew,
            strategist: row.strategist,
            supplier: row.supplier,
            sponsor: row.sponsor,
            drivers: Vec::new(),
        });
    }

    let mut reader = csv::Reader::from_path(drivers_path)
        .with_context(|| format!("reading drivers from {}", drivers_path.display()))?;
    for row in reader.deserialize() {
        let row: DriverRow = row.context("parsing driver row")?;
        let Some(&team_idx) = index.get(&row.team) else {
            bail!("driver {} names unknown team {}", row.name, row.team);
        };
        teams[team_idx].drivers.push(Driver {
            name: row.name,
            nationality: row.nationality,
            speed: row.speed,
            skill: row.skill,
            bravery: row.bravery,
            fitness: row.fitness,
            experience: row.experience,
            morale: row.morale,
            psyche: row.psyche,
            preferred_discipline: row.discipline,
            preferred_track: row.track,
            style: row.style,
            traits: DriverTrait::parse_tags(&row.traits),
        });
    }

    teams.retain(|t| !t.drivers.is_empty());
    if teams.is_empty() {
        bail!("roster has no team with drivers");
    }
    Ok(teams)
}

/// Load the season schedule, ordered by round.
pub fn load_schedule(path: &Path) -> Result<Vec<RaceEvent>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading schedule from {}", path.display()))?;
    let mut events = Vec::new();
    for row in reader.deserialize() {
        let row: ScheduleRow = row.context("parsing schedule row")?;
        events.push(RaceEvent {
            round: row.round,
            circuit: row.circuit,
            country: row.country,
            circuit_type: row.circuit_type,
            speed: row.speed,
            odds: WeatherOdds {
                clear: row.clear,
                rainy: row.rainy,
                overcast: row.overcast,
                hot: row.hot,
                stormy: row.stormy,
            },
            characteristics: parse_track_traits(&row.characteristics),
            laps: row.laps,
            base_time: row.base_time,
            grid_size: row.grid_size,
            difficulty: row.difficulty,
            premier: row.premier,
        });
    }
    if events.is_empty() {
        bail!("schedule {} is empty", path.display());
    }
    events.sort_by_key(|e| e.round);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEAM_HEADER: &str = "name,charter,status,characteristics,design,performance,aero,gearbox,suspension,brakes,power,reliability,engine_reliability,wear,engineer,pitcrew,strategist,supplier,sponsor";
    const DRIVER_HEADER: &str = "name,nationality,team,speed,skill,bravery,fitness,experience,morale,psyche,discipline,track,style,traits";

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", contents).unwrap();
        path
    }

    #[test]
    fn roster_loads_and_attaches_drivers() {
        let dir = tempfile::tempdir().unwrap();
        let teams = write_file(
            dir.path(),
            "teams.csv",
            &format!(
                "{}\nApex Racing,true,Premier,ShortTrackSpecialist,Balanced,80,70,70,70,70,75,0.95,0.95,0.0,Great,Fair,Excellent,Apex Power,Apex Oil",
                TEAM_HEADER
            ),
        );
        let drivers = write_file(
            dir.path(),
            "drivers.csv",
            &format!(
                "{}\nJo Fast,GBR,Apex Racing,85,82,60,0.9,0.8,0.7,0.7,Any,Both,Balanced,Adaptive|GreatOvertaker",
                DRIVER_HEADER
            ),
        );
        let roster = load_roster(&teams, &drivers).unwrap();
        assert_eq!(roster.len(), 1);
        let team = &roster[0];
        assert!(team.has_status(TeamStatus::Premier));
        assert!(team.has_characteristic(TeamCharacteristic::ShortTrackSpecialist));
        assert_eq!(team.drivers.len(), 1);
        assert!(team.drivers[0].traits.contains(&DriverTrait::Adaptive));
    }

    #[test]
    fn unknown_team_reference_fails() {
        let dir = tempfile::tempdir().unwrap();
        let teams = write_file(
            dir.path(),
            "teams.csv",
            &format!(
                "{}\nApex Racing,true,,,Balanced,80,70,70,70,70,75,0.95,0.95,0.0,Fair,Fair,Fair,,",
                TEAM_HEADER
            ),
        );
        let drivers = write_file(
            dir.path(),
            "drivers.csv",
            &format!(
                "{}\nJo Fast,GBR,Ghost Racing,85,82,60,0.9,0.8,0.7,0.7,Any,Both,Balanced,",
                DRIVER_HEADER
            ),
        );
        assert!(load_roster(&teams, &drivers).is_err());
    }

    #[test]
    fn schedule_sorts_by_round() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = write_file(
            dir.path(),
            "schedule.csv",
            "round,circuit,country,circuit_type,speed,clear,rainy,overcast,hot,stormy,characteristics,laps,base_time,grid_size,difficulty,premier\n\
             2,Harbor Street,MCO,Street Track,Low,0.6,0.2,0.2,0,0,Prestigious,70,75,20,0.8,true\n\
             1,Plains Speedway,USA,Superspeedway,High,0.7,0.1,0.1,0.1,0,Chaotic,200,45,40,0.3,false",
        );
        let events = load_schedule(&schedule).unwrap();
        assert_eq!(events[0].round, 1);
        assert_eq!(events[0].circuit_type, CircuitType::Superspeedway);
        assert!(events[1].has_trait(TrackTrait::Prestigious));
        assert!(events[1].premier);
    }
}
