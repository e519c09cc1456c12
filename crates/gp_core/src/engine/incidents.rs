//! Incident rolls: crashes, mechanical retirements, collisions, pit
//! stops. Pure probability helpers; the race engines decide when to
//! call them and mark the DNF.

use super::form::{CarForm, DriverForm};
use crate::models::{Team, TeamStatus};
use rand::Rng;

fn clamp_chance(p: f64) -> f64 {
    p.clamp(0.0, 0.999)
}

// ============================================================================
// Single-shot variant
// ============================================================================

/// Solo crash check for the single-shot race. Skill is the survival
/// stat; driving over one's skill (speed above skill) erodes the
/// second gate; a final 35% gate keeps crashes rare.
pub fn crash_single(form: &DriverForm, rng: &mut impl Rng) -> bool {
    let control = clamp_chance(form.skill / 100.0);
    if rng.gen::<f64>() < control {
        return false;
    }
    let composure = clamp_chance(0.65 + (form.skill - form.speed) / 100.0);
    if rng.gen::<f64>() < composure {
        return false;
    }
    rng.gen_bool(0.35)
}

/// Mechanical retirement for the single-shot race. The threshold is
/// the series' second gate. Start/Park entries outside the top 30% of
/// the grid park deliberately, modeled by scaling both gates down
/// hard.
pub fn retirement_single(
    car: &CarForm,
    team: &Team,
    grid_pos: usize,
    grid_size: usize,
    retirement_threshold: f64,
    rng: &mut impl Rng,
) -> bool {
    let mut survival = clamp_chance(car.reliability - team.wear);
    let mut threshold = retirement_threshold;
    let parked = team.has_status(TeamStatus::StartAndPark)
        && grid_size > 0
        && grid_pos * 10 > grid_size * 3;
    if parked {
        survival *= 0.15;
        threshold *= 0.15;
    }
    rng.gen::<f64>() > survival && rng.gen::<f64>() > threshold
}

/// Pairwise collision chance from the two drivers' single-shot forms.
/// Mirrors the crash shape: a skill gate, then the composure gap.
pub fn collision_pair_single(a: &DriverForm, b: &DriverForm, rng: &mut impl Rng) -> bool {
    let steadier = a.skill.max(b.skill);
    if rng.gen::<f64>() < clamp_chance(steadier / 100.0) {
        return false;
    }
    let gap = clamp_chance(0.65 + ((a.skill - a.speed).min(b.skill - b.speed)) / 100.0);
    rng.gen::<f64>() > gap
}

// ============================================================================
// Staged variant
// ============================================================================

/// Per-stint crash check. Three gates: driver control, a flat 0.925
/// survival gate that keeps crashes rare per stint, then risk that
/// builds through the race. Driving over one's skill erodes the last
/// gate.
pub fn crash_in_stint(form: &DriverForm, stint: u32, stints: u32, rng: &mut impl Rng) -> bool {
    let control = ((form.skill + form.bravery / 4.0) / 125.0).min(0.925);
    if rng.gen::<f64>() < control {
        return false;
    }
    if rng.gen::<f64>() < 0.925 {
        return false;
    }
    let stint_factor = stint as f64 / stints.max(1) as f64;
    let pressure = ((form.speed - form.skill) / 100.0).max(0.0);
    rng.gen::<f64>() < (0.1 + pressure) * stint_factor
}

/// Per-stint mechanical retirement. Three gates: base reliability,
/// the 0.8 threshold, and race wear that opens up late in the race.
pub fn retirement_in_stint(
    car: &CarForm,
    team: &Team,
    stint: u32,
    stints: u32,
    rng: &mut impl Rng,
) -> bool {
    let mut survival = clamp_chance(car.reliability - team.wear);
    let mut threshold = 0.8;
    if team.has_status(TeamStatus::StartAndPark) {
        survival *= 0.1;
        threshold *= 0.1;
    }
    if rng.gen::<f64>() < survival {
        return false;
    }
    if rng.gen::<f64>() < threshold {
        return false;
    }
    let race_wear = 1.0 - stint as f64 / stints.max(1) as f64;
    rng.gen::<f64>() > race_wear
}

/// Per-stint pairwise collision chance, gated at 0.99 and growing with
/// race distance.
pub fn collision_pair_stint(
    a: &DriverForm,
    b: &DriverForm,
    stint: u32,
    stints: u32,
    rng: &mut impl Rng,
) -> bool {
    let steadier = (a.skill.max(b.skill) / 100.0).min(0.99);
    if rng.gen::<f64>() < steadier {
        return false;
    }
    let stint_factor = stint as f64 / stints.max(1) as f64;
    let friction = (((a.speed - a.skill) + (b.speed - b.skill)) / 200.0).max(0.0);
    rng.gen::<f64>() < (0.15 + friction) * stint_factor
}

// ============================================================================
// Pit stops
// ============================================================================

/// Score multiplier for a stint spent pitting. Base 0.5 for the time
/// lost in the lane, scaled by the crew's quality band; a botched stop
/// halves to quarters what is left.
pub fn pit_stop_multiplier(team: &Team, rng: &mut impl Rng) -> f64 {
    let (lo, hi) = team.pitcrew.pit_speed_range();
    let mut multiplier = 0.5 * rng.gen_range(lo..hi);
    if rng.gen::<f64>() < team.pitcrew.pit_mistake_chance() {
        multiplier *= rng.gen_range(0.25..0.5);
    }
    multiplier
}
