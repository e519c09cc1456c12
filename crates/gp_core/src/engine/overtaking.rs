//! Wheel-to-wheel helpers for the staged race loop: overtake attempts,
//! blocking, clean-air running, and the rare escalation of a failed
//! move into contact.

use super::form::DriverForm;
use crate::models::{Driver, DriverTrait};
use rand::Rng;

/// Score nudges per wheel-to-wheel outcome. Small against a stint
/// score near 1.0, large enough to swap close cars.
pub const OVERTAKE_GAIN: f64 = 0.025;
pub const OVERTAKE_FAIL: f64 = -0.01;
pub const BLOCK_FAIL: f64 = -0.025;
pub const CLEAN_AIR_MOD: f64 = 0.015;

/// Chance a failed move turns into contact at all.
pub const ESCALATION_CHANCE: f64 = 0.01;

/// Weights for how many cars ahead a driver attacks this stint
/// (0 through 4 attempts). Aggression reshapes the whole vector.
pub fn attempt_weights(driver: &Driver) -> [f64; 5] {
    if driver.has(DriverTrait::Aggressive) {
        [0.35, 0.3, 0.2, 0.1, 0.05]
    } else if driver.has(DriverTrait::Cautious) {
        [0.65, 0.25, 0.075, 0.02, 0.005]
    } else {
        [0.5, 0.3, 0.15, 0.05, 0.025]
    }
}

/// Mid-pack cars see the most traffic; the leader and the tail see
/// the least. `pos` is 1-based within `field` live cars.
pub fn traffic_factor(pos: usize, field: usize) -> f64 {
    if field < 2 {
        return 0.0;
    }
    let center = (field as f64 + 1.0) / 2.0;
    let offset = ((pos as f64) - center).abs() / center;
    1.0 - 0.5 * offset
}

/// One overtake attempt. The move lands on pace difference; bravery
/// carries marginal moves and the defender's skill shuts them down.
pub fn overtake_succeeds(
    attacker: &DriverForm,
    attacker_driver: &Driver,
    defender: &DriverForm,
    defender_driver: &Driver,
    performance_gap: f64,
    rng: &mut impl Rng,
) -> bool {
    let mut chance = 0.3 + performance_gap / 200.0;
    chance += (attacker.speed - defender.speed) / 400.0;
    chance += (attacker.bravery - 50.0) / 500.0;
    chance -= (defender.skill - 50.0) / 400.0;

    if attacker_driver.has(DriverTrait::GreatOvertaker) {
        chance *= 1.1;
    }
    if attacker_driver.has(DriverTrait::PoorOvertaker) {
        chance *= 0.9;
    }
    if defender_driver.has(DriverTrait::GreatBlocker) {
        chance *= 0.9;
    }
    if defender_driver.has(DriverTrait::PoorBlocker) {
        chance *= 1.1;
    }

    rng.gen::<f64>() < chance.clamp(0.01, 0.95)
}

/// Outcome of a failed move escalating into contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    pub attacker_out: bool,
    pub defender_out: bool,
}

/// Roll whether a failed move becomes contact. The instigator usually
/// comes off worse.
pub fn escalate_failure(rng: &mut impl Rng) -> Option<Escalation> {
    if rng.gen::<f64>() >= ESCALATION_CHANCE {
        return None;
    }
    let esc = Escalation {
        attacker_out: rng.gen_bool(0.75),
        defender_out: rng.gen_bool(0.5),
    };
    if esc.attacker_out || esc.defender_out {
        Some(esc)
    } else {
        None
    }
}

/// Clean-air effect for cars running on the fringes once the field has
/// spread out. The front quarter breathes clean air and gains, the
/// back quarter sits in turbulence and loses. Traits scale the swing,
/// they never gate it.
pub fn clean_air_mod(
    driver: &Driver,
    pos: usize,
    field: usize,
    spread: f64,
    rng: &mut impl Rng,
) -> f64 {
    if field < 2 {
        return 0.0;
    }
    // Fringe = front or back quarter of the live field.
    let front = pos * 4 <= field;
    let back = pos * 4 >= field * 3;
    if (!front && !back) || rng.gen::<f64>() > spread {
        return 0.0;
    }
    let mut swing = CLEAN_AIR_MOD;
    if driver.has(DriverTrait::GreatInCleanAir) {
        swing *= 1.5;
    }
    if driver.has(DriverTrait::PoorInCleanAir) {
        swing *= 0.5;
    }
    if front {
        swing
    } else {
        -swing
    }
}
