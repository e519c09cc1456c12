//! Single-shot race resolution: the whole race collapses into one
//! scored pass per car, with incidents resolved up front. Used for the
//! disciplines that race in packs rather than in strategy stints.

use super::form::{roll_session_form, special_multiplier};
use super::incidents;
use super::modifiers::{apply_position_traits, base_chain};
use super::strategy::strategy_call;
use crate::models::{DnfReason, Driver, EntryState, EventContext, Team, TrackTrait, Weather};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

/// How one car's race ended. A DNF is never a score; zero is a valid
/// (terrible) finishing score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceOutcome {
    Finished(f64),
    Out(DnfReason),
}

impl RaceOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, RaceOutcome::Finished(_))
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            RaceOutcome::Finished(s) => Some(*s),
            RaceOutcome::Out(_) => None,
        }
    }
}

/// One starter: roster references plus the entry state brought over
/// from qualifying. Grid position is 1-based.
pub struct RaceEntry<'a> {
    pub driver: &'a Driver,
    pub team: &'a Team,
    pub grid_pos: usize,
    pub state: EntryState,
}

/// Per-driver weights for how many grid neighbors to tangle with,
/// weighted heavily toward none.
const COLLISION_COUNT_WEIGHTS: [f64; 4] = [0.5, 0.2, 0.1, 0.05];

fn additive_randomness(ctx: &EventContext, rng: &mut impl Rng) -> f64 {
    let mut width = 24.0 * ctx.event.circuit_type.jitter_scale();
    match ctx.weather {
        Weather::Rainy => width *= 1.25,
        Weather::Stormy => width *= 1.5,
        _ => {}
    }
    if ctx.discipline == crate::models::Discipline::StockCar {
        width *= 1.15;
    }
    if ctx.event.has_trait(TrackTrait::Chaotic) {
        width *= 1.25;
    }
    if ctx.event.has_trait(TrackTrait::Tame) {
        width *= 0.8;
    }
    rng.gen_range(-width..width)
}

/// Resolve the pre-race collision incidents. Each driver draws a
/// weighted candidate count and tangles with grid neighbors within
/// three positions ahead; both parties of a hit are marked out.
fn collision_pass(entries: &mut [RaceEntry<'_>], ctx: &EventContext, rng: &mut impl Rng) {
    if entries.len() < 2 {
        return;
    }
    let dist = WeightedIndex::new(COLLISION_COUNT_WEIGHTS).expect("static weights");
    for i in 0..entries.len() - 1 {
        let candidates = dist.sample(rng);
        for _ in 0..candidates {
            let span = (entries.len() - 1 - i).min(3);
            let j = i + rng.gen_range(1..=span);
            if !entries[i].state.is_running() || !entries[j].state.is_running() {
                continue;
            }
            let (fa, _) = base_chain(entries[i].driver, entries[i].team, ctx, rng);
            let (fb, _) = base_chain(entries[j].driver, entries[j].team, ctx, rng);
            if incidents::collision_pair_single(&fa, &fb, rng) {
                log::debug!(
                    "collision between {} and {}",
                    entries[i].driver.name,
                    entries[j].driver.name
                );
                entries[i].state.retire(DnfReason::Collision);
                entries[j].state.retire(DnfReason::Collision);
            }
        }
    }
}

/// Score one surviving car.
fn race_score(
    entry: &RaceEntry<'_>,
    grid_size: usize,
    ctx: &EventContext,
    rng: &mut impl Rng,
) -> f64 {
    let (d, c) = base_chain(entry.driver, entry.team, ctx, rng);
    let d = apply_position_traits(
        d,
        entry.driver,
        ctx,
        entry.grid_pos,
        grid_size,
        true,
        rng,
    );

    let form = roll_session_form(entry.driver.speed, entry.team, ctx, rng);
    let special = special_multiplier(form, rng);

    let driver_term = (d.speed / 2.0 + d.skill) * 0.75 * special;
    let car_term = c.performance * (1.0 - 0.75 * entry.team.wear) + c.power;
    let strategy = strategy_call(entry.team.strategist, entry.driver, ctx.weather, rng);

    let pos = entry.grid_pos as f64;
    let position_penalty = (pos - pos * 0.25) * ctx.event.circuit_type.position_penalty_coeff();

    driver_term + car_term + strategy + additive_randomness(ctx, rng) - position_penalty
}

/// Run the single-shot race over the assembled grid. Entries keep
/// their order; the caller ranks the returned outcomes.
pub fn run_race_single(
    entries: &mut [RaceEntry<'_>],
    ctx: &EventContext,
    rng: &mut impl Rng,
) -> Vec<RaceOutcome> {
    let grid_size = entries.len();
    collision_pass(entries, ctx, rng);

    let mut outcomes = Vec::with_capacity(entries.len());
    for entry in entries.iter_mut() {
        if let Some(reason) = entry.state.dnf {
            outcomes.push(RaceOutcome::Out(reason));
            continue;
        }
        let (d, c) = base_chain(entry.driver, entry.team, ctx, rng);
        if incidents::crash_single(&d, rng) {
            entry.state.retire(DnfReason::Crash);
            outcomes.push(RaceOutcome::Out(DnfReason::Crash));
            continue;
        }
        if incidents::retirement_single(
            &c,
            entry.team,
            entry.grid_pos,
            grid_size,
            ctx.rules.retirement_threshold,
            rng,
        ) {
            entry.state.retire(DnfReason::Retirement);
            outcomes.push(RaceOutcome::Out(DnfReason::Retirement));
            continue;
        }
        outcomes.push(RaceOutcome::Finished(race_score(entry, grid_size, ctx, rng)));
    }
    outcomes
}
