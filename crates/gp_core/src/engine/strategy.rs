//! Pit-wall strategy calls. Tier-banded asymmetric outcomes: weak
//! strategists rarely hit and miss big, strong ones hit often and
//! lose little.

use crate::models::{CrewTier, Driver, DriverTrait, Weather};
use rand::Rng;

/// Tier branch table shared by both variants: (hit chance, hit size,
/// miss chance, miss size, baseline drift). Sizes are in additive
/// score points; the stint variant divides them down.
fn tier_branch(tier: CrewTier) -> (f64, f64, f64, f64, f64) {
    match tier {
        CrewTier::Terrible => (0.10, 10.0, 0.30, -30.0, -20.0),
        CrewTier::Poor => (0.15, 15.0, 0.25, -25.0, -15.0),
        CrewTier::Fair => (0.20, 20.0, 0.20, -20.0, -10.0),
        CrewTier::Great => (0.25, 25.0, 0.15, -15.0, -5.0),
        CrewTier::Excellent => (0.30, 30.0, 0.10, -10.0, 0.0),
    }
}

// Scales the whole call, hits and misses alike.
fn trait_scale(driver: &Driver, call: f64) -> f64 {
    let mut call = call;
    if driver.has(DriverTrait::Strategist) {
        call *= 1.15;
    }
    if driver.has(DriverTrait::GoodInstincts) {
        call *= 1.05;
    }
    if driver.has(DriverTrait::PoorCommunicator) {
        call *= 0.85;
    }
    call
}

/// Additive strategy term for the single-shot race score.
pub fn strategy_call(
    tier: CrewTier,
    driver: &Driver,
    weather: Weather,
    rng: &mut impl Rng,
) -> f64 {
    let (hit_p, hit, miss_p, miss, drift) = tier_branch(tier);
    let roll = rng.gen::<f64>();
    let call = if roll < hit_p {
        hit
    } else if roll < hit_p + miss_p {
        miss
    } else {
        drift
    };
    trait_scale(driver, call) * weather.strategy_scale()
}

/// Multiplicative variant for the staged loop: the same call spread
/// over the race, `1 + call/100/stints` per stint.
pub fn stint_strategy_factor(
    tier: CrewTier,
    driver: &Driver,
    weather: Weather,
    stints: u32,
    rng: &mut impl Rng,
) -> f64 {
    let call = strategy_call(tier, driver, weather, rng) / 100.0;
    1.0 + call / (stints.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisciplinePreference, DrivingStyle, TrackPreference};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn driver_with(traits: &[DriverTrait]) -> Driver {
        Driver {
            name: "D".into(),
            nationality: "".into(),
            speed: 70.0,
            skill: 70.0,
            bravery: 50.0,
            fitness: 0.9,
            experience: 0.7,
            morale: 0.7,
            psyche: 0.7,
            preferred_discipline: DisciplinePreference::Any,
            preferred_track: TrackPreference::Both,
            style: DrivingStyle::Balanced,
            traits: traits.iter().copied().collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn excellent_wall_never_loses_more_than_the_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let driver = driver_with(&[]);
        for _ in 0..500 {
            let call = strategy_call(CrewTier::Excellent, &driver, Weather::Clear, &mut rng);
            assert!(call >= -10.0 && call <= 30.0);
        }
    }

    #[test]
    fn terrible_wall_averages_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let driver = driver_with(&[]);
        let total: f64 = (0..1000)
            .map(|_| strategy_call(CrewTier::Terrible, &driver, Weather::Clear, &mut rng))
            .sum();
        assert!(total / 1000.0 < -10.0);
    }

    #[test]
    fn pit_wall_traits_scale_hits_and_misses_alike() {
        let planner = driver_with(&[DriverTrait::Strategist]);
        let calm = driver_with(&[DriverTrait::GoodInstincts]);
        let noisy = driver_with(&[DriverTrait::PoorCommunicator]);
        assert_eq!(trait_scale(&planner, 20.0), 20.0 * 1.15);
        assert_eq!(trait_scale(&planner, -20.0), -20.0 * 1.15);
        assert_eq!(trait_scale(&calm, 20.0), 20.0 * 1.05);
        assert_eq!(trait_scale(&calm, -20.0), -20.0 * 1.05);
        assert_eq!(trait_scale(&noisy, 20.0), 20.0 * 0.85);
        assert_eq!(trait_scale(&noisy, -20.0), -20.0 * 0.85);
    }

    #[test]
    fn stint_factor_stays_near_unity() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let driver = driver_with(&[]);
        for _ in 0..500 {
            let f = stint_strategy_factor(CrewTier::Fair, &driver, Weather::Stormy, 6, &mut rng);
            assert!(f > 0.9 && f < 1.1);
        }
    }
}
