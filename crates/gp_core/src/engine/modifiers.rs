//! The attribute modifier chain.
//!
//! Every step is a pure function from form snapshots to form
//! snapshots; the composition order is fixed and is itself part of the
//! engine's contract:
//!
//! weather -> track preference -> discipline -> style vs design ->
//! form traits -> track difficulty -> morale, then for races the
//! position traits and fitness decay on top.

use super::form::{CarForm, DriverForm};
use crate::models::{
    Discipline, Driver, DriverTrait, DrivingStyle, EventContext, Team, TrackPreference,
    TrackTrait, Weather,
};
use rand::Rng;

// ============================================================================
// Chain steps
// ============================================================================

pub fn apply_weather(
    mut d: DriverForm,
    mut c: CarForm,
    driver: &Driver,
    weather: Weather,
) -> (DriverForm, CarForm) {
    let wet_specialist = driver.has(DriverTrait::WetWeatherSpecialist);
    match weather {
        Weather::Rainy => {
            c.performance *= 0.9;
            c.power *= 0.9;
            if !wet_specialist {
                d.speed *= 0.95;
                d.skill *= 0.95;
            }
        }
        Weather::Overcast => {
            c.reliability = (c.reliability * 1.025).min(0.999);
        }
        Weather::Hot => {
            d.skill *= 0.975;
            c.reliability *= 0.975;
        }
        Weather::Stormy => {
            c.performance *= 0.75;
            c.power *= 0.75;
            if !wet_specialist {
                d.speed *= 0.9;
                d.skill *= 0.9;
            }
        }
        Weather::Clear => {}
    }
    (d, c)
}

/// Track layout fit. The mismatch penalty lands first and the
/// specialist bonus compounds on top of it, so a specialist on the
/// wrong layout class nets x0.935, not x1.0.
pub fn apply_track_preference(
    mut d: DriverForm,
    mut c: CarForm,
    driver: &Driver,
    team: &Team,
    ctx: &EventContext,
) -> (DriverForm, CarForm) {
    let circuit = ctx.event.circuit_type;
    let mismatched = match driver.preferred_track {
        TrackPreference::Both => false,
        TrackPreference::Road => circuit.is_oval_class(),
        TrackPreference::Oval => circuit.is_road_class(),
    };
    if mismatched {
        d.speed *= 0.85;
        d.skill *= 0.85;
    }
    if let Some(specialist) = circuit.specialist_trait() {
        if driver.has(specialist) {
            d.speed *= 1.1;
            d.skill *= 1.1;
        }
    }
    if circuit.is_road_class() && driver.has(DriverTrait::PoorAtRoadCourses) {
        d.speed *= 0.85;
        d.skill *= 0.85;
    }
    if let Some(characteristic) = circuit.specialist_characteristic() {
        if team.has_characteristic(characteristic) {
            c.performance *= 1.1;
            c.power *= 1.1;
        }
    }
    (d, c)
}

pub fn apply_discipline(mut d: DriverForm, driver: &Driver, discipline: Discipline) -> DriverForm {
    if driver.preferred_discipline.matches(discipline) {
        return d;
    }
    let adaptive = driver.has(DriverTrait::Adaptive);
    let mut factor: f64 = match discipline {
        Discipline::OpenWheel | Discipline::StockCar => {
            let mut f = 0.65;
            if adaptive {
                f *= 1.15;
            }
            f
        }
        Discipline::Touring | Discipline::Endurance => {
            let mut f = 0.85;
            if adaptive {
                f *= 1.05;
            }
            f
        }
    };
    factor = factor.min(1.0);
    d.speed *= factor;
    d.skill *= factor;
    d
}

/// Chassis balance fit. A driver in a car built the way they drive
/// takes no damp; everything else samples a band.
pub fn apply_style(
    mut d: DriverForm,
    driver: &Driver,
    team: &Team,
    rng: &mut impl Rng,
) -> DriverForm {
    let band = match (driver.style, team.design) {
        (DrivingStyle::None, _) | (_, DrivingStyle::None) => Some((0.9, 0.975)),
        (a, b) if a == b => None,
        (DrivingStyle::Balanced, _) | (_, DrivingStyle::Balanced) => Some((0.925, 0.975)),
        _ => Some((0.85, 0.925)),
    };
    if let Some((lo, hi)) = band {
        let damp = rng.gen_range(lo..hi);
        d.speed *= damp;
        d.skill *= damp;
    }
    d
}

pub fn apply_form_traits(
    mut d: DriverForm,
    driver: &Driver,
    ctx: &EventContext,
    rng: &mut impl Rng,
) -> DriverForm {
    if driver.has(DriverTrait::Inconsistent) {
        if rng.gen_bool(0.5) {
            let slump = rng.gen_range(0.8..0.9);
            d.speed *= slump;
            d.skill *= slump;
        }
        if rng.gen_bool(0.15) {
            let spike = rng.gen_range(1.05..1.1);
            d.speed *= spike;
            d.skill *= spike;
        }
    }

    let first_half = ctx.event.round * 2 <= ctx.season_length;
    if driver.has(DriverTrait::EarlySeasonPeak) {
        let f = if first_half { 1.05 } else { 0.95 };
        d.speed *= f;
        d.skill *= f;
    }
    if driver.has(DriverTrait::LateSeasonPeak) {
        let f = if first_half { 0.95 } else { 1.05 };
        d.speed *= f;
        d.skill *= f;
    }

    if driver.has(DriverTrait::Overwhelmed) {
        if rng.gen_bool(0.25) {
            d.speed *= 0.9;
        }
        if rng.gen_bool(0.25) {
            d.skill *= 0.9;
        }
    }
    d
}

/// Hard circuits punish weak stats harder than strong ones, and punish
/// inexperience on top.
pub fn apply_difficulty(mut d: DriverForm, driver: &Driver, difficulty: f64) -> DriverForm {
    let factor = difficulty / 2.5;
    d.speed *= 1.0 - factor * ((100.0 - d.speed).max(0.0) / 100.0);
    let inexperience = 1.0 + (1.0 - driver.experience);
    d.skill *= 1.0 - factor * ((100.0 - d.skill).max(0.0) / 100.0) * inexperience;
    d
}

pub fn apply_morale(mut d: DriverForm, driver: &Driver) -> DriverForm {
    // Both bands pivot on 0.75; the middle is neutral.
    let factor = if driver.morale > 0.8 || driver.morale < 0.5 {
        1.0 + (driver.morale - 0.75) * 0.25
    } else {
        1.0
    };
    d.speed *= factor;
    d.skill *= factor;
    d
}

// ============================================================================
// Race-only steps
// ============================================================================

/// Grid-position traits. These model the start, so they touch the
/// opening stint only; later stints take the form unchanged.
pub fn apply_position_traits(
    mut d: DriverForm,
    driver: &Driver,
    ctx: &EventContext,
    grid_pos: usize,
    grid_size: usize,
    first_stint: bool,
    rng: &mut impl Rng,
) -> DriverForm {
    if !first_stint {
        return d;
    }
    let back_of_pack = grid_size > 0 && grid_pos * 4 > grid_size * 3;
    if back_of_pack {
        if driver.has(DriverTrait::Heroic) {
            d.speed *= 1.05;
            d.skill *= 1.05;
        }
        if driver.has(DriverTrait::Yielding) {
            d.speed *= 0.9;
            d.skill *= 0.9;
        }
    }
    if grid_pos == 1 {
        if driver.has(DriverTrait::PoorFromPole) {
            d.speed *= 0.9;
            d.skill *= 0.9;
        }
        if driver.has(DriverTrait::GreatFromPole) {
            d.speed *= 1.05;
            d.skill *= 1.05;
        }
    }
    // Big-occasion nerves hit fragile drivers at the start.
    if ctx.event.has_trait(TrackTrait::Prestigious)
        && driver.psyche < 0.5
        && rng.gen_bool(0.15)
    {
        d.speed *= 0.9;
        d.skill *= 0.9;
    }
    d
}

/// Late-race fade for unfit drivers. `progress` is stint / stints.
pub fn apply_fitness_decay(mut d: DriverForm, driver: &Driver, progress: f64) -> DriverForm {
    let factor = 1.0 - (1.0 - driver.fitness) * progress.clamp(0.0, 1.0);
    d.speed *= factor;
    d.skill *= factor;
    d
}

// ============================================================================
// Composed chain
// ============================================================================

/// The shared prefix of the chain used by both qualifying and race
/// scoring.
pub fn base_chain(
    driver: &Driver,
    team: &Team,
    ctx: &EventContext,
    rng: &mut impl Rng,
) -> (DriverForm, CarForm) {
    let d = DriverForm::from_driver(driver);
    let c = CarForm::from_team(team, ctx.event.speed);
    let (d, c) = apply_weather(d, c, driver, ctx.weather);
    let (d, c) = apply_track_preference(d, c, driver, team, ctx);
    let d = apply_discipline(d, driver, ctx.discipline);
    let d = apply_style(d, driver, team, rng);
    let d = apply_form_traits(d, driver, ctx, rng);
    let d = apply_difficulty(d, driver, ctx.event.difficulty);
    let d = apply_morale(d, driver);
    (d, c)
}
