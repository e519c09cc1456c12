//! Staged race resolution: the race runs as a fixed number of stints,
//! each re-scoring the live field, resolving incidents and
//! wheel-to-wheel moves, and re-sorting the running order. The order
//! after the last stint is the classification.

use super::form::{roll_session_form, session_jitter, special_multiplier, DriverForm};
use super::incidents;
use super::modifiers::{apply_fitness_decay, apply_position_traits, base_chain};
use super::overtaking::{
    attempt_weights, clean_air_mod, escalate_failure, overtake_succeeds, traffic_factor,
    BLOCK_FAIL, OVERTAKE_FAIL, OVERTAKE_GAIN,
};
use super::race::{RaceEntry, RaceOutcome};
use super::sort_keys::race_order;
use super::strategy::stint_strategy_factor;
use crate::models::{DnfReason, Driver, EventContext, Team};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

/// One car inside the staged loop. `outcome` carries the latest stint
/// score while the car runs and freezes into the DNF reason when it
/// stops.
pub struct StagedEntry<'a> {
    pub driver: &'a Driver,
    pub team: &'a Team,
    pub grid_pos: usize,
    pub state: crate::models::EntryState,
    pub outcome: RaceOutcome,
    /// Driver form from the latest scoring pass, kept for the
    /// wheel-to-wheel and collision rolls.
    form: DriverForm,
    performance: f64,
}

impl<'a> StagedEntry<'a> {
    fn is_running(&self) -> bool {
        self.state.is_running()
    }

    fn retire(&mut self, reason: DnfReason) {
        self.state.retire(reason);
        if let Some(cause) = self.state.dnf {
            self.outcome = RaceOutcome::Out(cause);
        }
    }

    fn scale_score(&mut self, factor: f64) {
        if let RaceOutcome::Finished(score) = &mut self.outcome {
            *score *= factor;
        }
    }
}

const COLLISION_COUNT_WEIGHTS: [f64; 4] = [0.5, 0.2, 0.1, 0.05];

/// The staged race state machine.
pub struct StintSimulation<'a> {
    entries: Vec<StagedEntry<'a>>,
    stints: u32,
}

impl<'a> StintSimulation<'a> {
    /// Build the loop from the starters in grid order.
    pub fn new(starters: Vec<RaceEntry<'a>>, ctx: &EventContext) -> Self {
        let entries = starters
            .into_iter()
            .map(|s| StagedEntry {
                form: DriverForm::from_driver(s.driver),
                performance: s.team.performance,
                driver: s.driver,
                team: s.team,
                grid_pos: s.grid_pos,
                state: s.state,
                outcome: RaceOutcome::Finished(0.0),
            })
            .collect();
        StintSimulation {
            entries,
            stints: ctx.event.stints(),
        }
    }

    /// Run every stint and return the final classification order.
    pub fn run(mut self, ctx: &EventContext, rng: &mut impl Rng) -> Vec<StagedEntry<'a>> {
        for stint in 1..=self.stints {
            self.score_stint(stint, ctx, rng);
            self.wheel_to_wheel(stint, ctx, rng);
            self.blocking_pass(rng);
            self.collision_pass(stint, ctx, rng);
            self.entries.sort_by(|a, b| race_order(&a.outcome, &b.outcome));
        }
        self.entries
    }

    /// Stage (a): re-score every live car for this stint.
    fn score_stint(&mut self, stint: u32, ctx: &EventContext, rng: &mut impl Rng) {
        let progress = stint as f64 / self.stints as f64;
        for idx in 0..self.entries.len() {
            let pos = idx + 1;
            if !self.entries[idx].is_running() {
                continue;
            }
            let entry = &mut self.entries[idx];
            let driver = entry.driver;
            let team = entry.team;

            let (d, mut c) = base_chain(driver, team, ctx, rng);
            let d = apply_position_traits(
                d,
                driver,
                ctx,
                entry.grid_pos,
                ctx.event.grid_size,
                stint == 1,
                rng,
            );
            let d = apply_fitness_decay(d, driver, progress);

            // Worn tires blunt the car before they force the stop.
            let tire_effect = 1.0 - (1.0 - entry.state.tire_condition) * 0.25;
            c.performance *= tire_effect;
            c.power *= tire_effect;

            let mut decay = rng.gen_range(0.10..0.20);
            if ctx.event.has_trait(crate::models::TrackTrait::PoorSurface) {
                decay *= 1.5;
            }
            entry.state.tire_condition -= decay;
            entry.state.fuel -= rng.gen_range(0.9..1.2) / self.stints as f64;
            let mut pit_multiplier = 1.0;
            if entry.state.tire_condition < 0.5 || entry.state.fuel < 0.25 {
                entry.state.tire_condition = 1.0;
                entry.state.fuel = 1.0;
                pit_multiplier = incidents::pit_stop_multiplier(team, rng);
                // A slow stop shakes the crew's own belief.
                if pit_multiplier < 0.25 {
                    entry.state.team_confidence *= 0.9;
                }
            }

            if incidents::crash_in_stint(&d, stint, self.stints, rng) {
                entry.retire(DnfReason::Crash);
                continue;
            }
            if incidents::retirement_in_stint(&c, team, stint, self.stints, rng) {
                entry.retire(DnfReason::Retirement);
                continue;
            }

            let form = roll_session_form(driver.speed, team, ctx, rng);
            let special = special_multiplier(form, rng);
            let strategy = stint_strategy_factor(
                team.strategist,
                driver,
                ctx.weather,
                self.stints,
                rng,
            );
            let coeff = ctx.event.circuit_type.position_factor_coeff();
            let position_factor = 1.0 / (1.0 + (pos as f64 - 1.0) * coeff);

            let driver_term = (d.speed + d.skill / 2.0 + d.bravery / 10.0) * 0.75 * special;
            let car_term = c.performance * (1.0 - 0.75 * team.wear) + c.power;
            let confidence = 0.95 + 0.05 * entry.state.team_confidence;
            let stint_score = (driver_term + car_term)
                * strategy
                * position_factor
                * pit_multiplier
                * confidence
                * session_jitter(ctx, rng);

            // Each stint stands alone; only a DNF carries over.
            entry.outcome = RaceOutcome::Finished(stint_score);
            entry.form = d;
            entry.performance = c.performance;
        }
    }

    /// Stage (b): overtakes against up to five cars ahead, with the
    /// rare escalation into contact.
    fn wheel_to_wheel(&mut self, stint: u32, _ctx: &EventContext, rng: &mut impl Rng) {
        let field = self.entries.iter().filter(|e| e.is_running()).count();
        if field < 2 {
            return;
        }
        // The field spreads out as the race runs; clean air only
        // matters once it has.
        let spread = stint as f64 / self.stints as f64;
        for idx in 0..self.entries.len() {
            if !self.entries[idx].is_running() {
                continue;
            }
            let pos = idx + 1;

            let air = clean_air_mod(self.entries[idx].driver, pos, field, spread, rng);
            if air != 0.0 {
                self.entries[idx].scale_score(1.0 + air);
            }

            let weights = attempt_weights(self.entries[idx].driver);
            let dist = WeightedIndex::new(weights).expect("static weights");
            let attempts = dist.sample(rng);
            for k in 1..=attempts {
                if k > 5 || idx < k {
                    break;
                }
                let target = idx - k;
                if !self.entries[idx].is_running() || !self.entries[target].is_running() {
                    continue;
                }
                if rng.gen::<f64>() > traffic_factor(pos, field) {
                    continue;
                }
                let attacker_form = self.entries[idx].form;
                let defender_form = self.entries[target].form;
                let gap = self.entries[idx].performance - self.entries[target].performance;
                let success = overtake_succeeds(
                    &attacker_form,
                    self.entries[idx].driver,
                    &defender_form,
                    self.entries[target].driver,
                    gap,
                    rng,
                );
                if success {
                    self.entries[idx].scale_score(1.0 + OVERTAKE_GAIN);
                } else {
                    self.entries[idx].scale_score(1.0 + OVERTAKE_FAIL);
                    if let Some(esc) = escalate_failure(rng) {
                        log::debug!(
                            "contact: {} into {}",
                            self.entries[idx].driver.name,
                            self.entries[target].driver.name
                        );
                        if esc.attacker_out {
                            self.entries[idx].retire(DnfReason::Collision);
                        }
                        if esc.defender_out {
                            self.entries[target].retire(DnfReason::Collision);
                        }
                    }
                }
            }
        }
    }

    /// Stage (c): each car defends against up to five cars behind. A
    /// chaser that gets alongside forces the defender off line for the
    /// small blocking penalty.
    fn blocking_pass(&mut self, rng: &mut impl Rng) {
        let field = self.entries.iter().filter(|e| e.is_running()).count();
        if field < 2 {
            return;
        }
        for idx in 0..self.entries.len() {
            if !self.entries[idx].is_running() {
                continue;
            }
            for k in 1..=5usize {
                let chaser = idx + k;
                if chaser >= self.entries.len() {
                    break;
                }
                if !self.entries[chaser].is_running() {
                    continue;
                }
                if rng.gen::<f64>() > traffic_factor(chaser + 1, field) {
                    continue;
                }
                let attacker_form = self.entries[chaser].form;
                let defender_form = self.entries[idx].form;
                let gap = self.entries[chaser].performance - self.entries[idx].performance;
                let pressured = overtake_succeeds(
                    &attacker_form,
                    self.entries[chaser].driver,
                    &defender_form,
                    self.entries[idx].driver,
                    gap,
                    rng,
                );
                if pressured {
                    self.entries[idx].scale_score(1.0 + BLOCK_FAIL);
                }
            }
        }
    }

    /// Stage (d): field-wide collision incidents. Each driver draws a
    /// weighted candidate count and tangles with running order
    /// neighbors within four positions.
    fn collision_pass(&mut self, stint: u32, _ctx: &EventContext, rng: &mut impl Rng) {
        if self.entries.len() < 2 {
            return;
        }
        let dist = WeightedIndex::new(COLLISION_COUNT_WEIGHTS).expect("static weights");
        for i in 0..self.entries.len() - 1 {
            let candidates = dist.sample(rng);
            for _ in 0..candidates {
                let span = (self.entries.len() - 1 - i).min(4);
                let j = i + rng.gen_range(1..=span);
                if !self.entries[i].is_running() || !self.entries[j].is_running() {
                    continue;
                }
                let fa = self.entries[i].form;
                let fb = self.entries[j].form;
                if incidents::collision_pair_stint(&fa, &fb, stint, self.stints, rng) {
                    self.entries[i].retire(DnfReason::Collision);
                    self.entries[j].retire(DnfReason::Collision);
                }
            }
        }
    }
}
