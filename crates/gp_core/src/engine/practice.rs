//! Practice weekend: setup knowledge and driver readiness accumulate
//! before qualifying, banded by engineer quality.

use crate::models::{EntryState, Team};
use rand::Rng;

/// Run the weekend's practice program for one entry. A productive
/// session adds a tier-banded chunk of setup knowledge and readiness;
/// an unproductive one churns part of what was already learned away.
/// Both values cap at 1.0.
pub fn run_practice(team: &Team, state: &mut EntryState, sessions: u32, rng: &mut impl Rng) {
    let chance = team.engineer.practice_gain_chance();
    let (lo, hi) = team.engineer.practice_gain_range();
    for _ in 0..sessions {
        if rng.gen_bool(chance) {
            state.chassis_setup = (state.chassis_setup + rng.gen_range(lo..hi)).min(1.0);
            state.readiness = (state.readiness + rng.gen_range(lo..hi)).min(1.0);
        } else {
            let churn = rng.gen_range(0.9..1.0);
            state.chassis_setup *= churn;
            state.readiness *= churn;
        }
    }
}

/// Car form scale from setup knowledge: half-dialed cars run at 75%.
pub fn setup_scale(chassis_setup: f64) -> f64 {
    0.5 + chassis_setup / 2.0
}

/// Driver form scale from readiness, same shape as the car side.
pub fn readiness_scale(readiness: f64) -> f64 {
    0.5 + readiness / 2.0
}
