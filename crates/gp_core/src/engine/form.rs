//! Session form: immutable attribute snapshots and the rare-day
//! (fantastic / shocking) machinery.
//!
//! Scoring never touches the roster objects. Each session builds a
//! [`DriverForm`] and [`CarForm`] snapshot, runs the modifier chain
//! over copies, and throws them away afterwards.

use crate::models::{EventContext, Team, TeamStatus, TrackSpeed};
use rand::Rng;

/// Driver attributes as they stand for one scoring pass. Plain values,
/// cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverForm {
    pub speed: f64,
    pub skill: f64,
    pub bravery: f64,
}

impl DriverForm {
    pub fn from_driver(driver: &crate::models::Driver) -> Self {
        DriverForm {
            speed: driver.speed,
            skill: driver.skill,
            bravery: driver.bravery,
        }
    }
}

/// Car attributes for one scoring pass. Performance folds in the
/// component sum; power is bent by the track speed class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarForm {
    pub performance: f64,
    pub power: f64,
    pub reliability: f64,
}

impl CarForm {
    pub fn from_team(team: &Team, speed: TrackSpeed) -> Self {
        let performance = team.performance
            + 0.1 * (team.aero + team.gearbox + team.suspension + team.brakes);
        CarForm {
            performance,
            power: shape_power(team.power, speed),
            // The weakest link fails first.
            reliability: team.reliability.min(team.engine_reliability),
        }
    }
}

/// High-speed circuits reward strong engines more than the raw number
/// says; low-speed circuits flatten the field toward the 50 baseline.
fn shape_power(power: f64, speed: TrackSpeed) -> f64 {
    let delta = power - 50.0;
    match speed {
        TrackSpeed::High => 50.0 + delta * (1.0 + delta.abs() / 100.0),
        TrackSpeed::Low => 50.0 + delta * (1.0 - delta.abs() / 200.0),
        TrackSpeed::Medium => power,
    }
}

/// Outcome of the rare-day roll for one car in one session. The two
/// flags roll independently; a wild session can set both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionForm {
    pub fantastic: bool,
    pub shocking: bool,
}

const BASE_FANTASTIC: f64 = 0.0075;
const BASE_SHOCKING: f64 = 0.015;

/// Roll whether this car has a fantastic or shocking session. Faster
/// drivers tilt toward fantastic, research programs are volatile both
/// ways, the strategist nudges the balance, and weather scales both.
pub fn roll_session_form(
    driver_speed: f64,
    team: &Team,
    ctx: &EventContext,
    rng: &mut impl Rng,
) -> SessionForm {
    let mut fantastic = BASE_FANTASTIC;
    let mut shocking = BASE_SHOCKING;

    let speed_shift = (driver_speed - 50.0) / 200.0;
    fantastic *= 1.0 + speed_shift;
    shocking *= 1.0 - speed_shift;

    if team.has_status(TeamStatus::ResearchAndDevelopment) && rng.gen_bool(0.5) {
        fantastic *= 1.1;
        shocking *= 1.25;
    }

    if let Some((fant_band, shock_band)) = team.strategist.form_swing() {
        fantastic *= rng.gen_range(fant_band.0..fant_band.1);
        shocking *= rng.gen_range(shock_band.0..shock_band.1);
    }

    let (fant_scale, shock_scale) = ctx.weather.form_scale();
    fantastic *= fant_scale;
    shocking *= shock_scale;

    SessionForm {
        fantastic: rng.gen::<f64>() < fantastic,
        shocking: rng.gen::<f64>() < shocking,
    }
}

/// Compounding cascade behind a fantastic or shocking session. One
/// step always lands; a 75% gate compounds a second and a 50% gate a
/// third, never more. Bonus steps are x1.25, penalty steps x0.75.
/// When both flags are set the two cascades multiply.
pub fn special_multiplier(form: SessionForm, rng: &mut impl Rng) -> f64 {
    let mut factor = 1.0;
    if form.fantastic {
        factor *= cascade(1.25, rng);
    }
    if form.shocking {
        factor *= cascade(0.75, rng);
    }
    factor
}

fn cascade(step: f64, rng: &mut impl Rng) -> f64 {
    let mut factor = step;
    if rng.gen_bool(0.75) {
        factor *= step;
        if rng.gen_bool(0.5) {
            factor *= step;
        }
    }
    factor
}

/// Per-session score jitter. Weather sets the half-width, pack-racing
/// circuits and stock cars widen it.
pub fn session_jitter(ctx: &EventContext, rng: &mut impl Rng) -> f64 {
    let mut half_width = ctx.weather.jitter_half_width();
    half_width *= ctx.event.circuit_type.jitter_scale();
    if ctx.discipline == crate::models::Discipline::StockCar {
        half_width *= 1.15;
    }
    if ctx.event.has_trait(crate::models::TrackTrait::Windy) {
        half_width *= 1.2;
    }
    let randomness = rng.gen_range(-half_width..half_width);
    1.0 + 2.0 * randomness
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CircuitType, RaceEvent, SeriesRules, Weather, WeatherOdds};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn test_event(circuit_type: CircuitType) -> RaceEvent {
        RaceEvent {
            round: 1,
            circuit: "Test".into(),
            country: "".into(),
            circuit_type,
            speed: TrackSpeed::Medium,
            odds: WeatherOdds::default(),
            characteristics: HashSet::new(),
            laps: 50,
            base_time: 90.0,
            grid_size: 20,
            difficulty: 0.5,
            premier: false,
        }
    }

    #[test]
    fn power_shaping_pivots_around_fifty() {
        assert_eq!(shape_power(50.0, TrackSpeed::High), 50.0);
        assert_eq!(shape_power(50.0, TrackSpeed::Low), 50.0);
        assert!(shape_power(90.0, TrackSpeed::High) > 90.0);
        assert!(shape_power(90.0, TrackSpeed::Low) < 90.0);
        assert!(shape_power(20.0, TrackSpeed::High) < 20.0);
        assert!(shape_power(20.0, TrackSpeed::Low) > 20.0);
    }

    #[test]
    fn neutral_form_has_unit_multiplier() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(special_multiplier(SessionForm::default(), &mut rng), 1.0);
    }

    #[test]
    fn cascade_runs_one_to_three_steps() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let up = special_multiplier(
                SessionForm {
                    fantastic: true,
                    shocking: false,
                },
                &mut rng,
            );
            assert!(up >= 1.25 && up <= 1.25_f64.powi(3) + 1e-9);
            let down = special_multiplier(
                SessionForm {
                    fantastic: false,
                    shocking: true,
                },
                &mut rng,
            );
            assert!(down <= 0.75 && down >= 0.75_f64.powi(3) - 1e-9);
        }
    }

    #[test]
    fn both_flags_multiply_their_cascades() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let both = special_multiplier(
                SessionForm {
                    fantastic: true,
                    shocking: true,
                },
                &mut rng,
            );
            let floor = 1.25 * 0.75_f64.powi(3);
            let ceil = 1.25_f64.powi(3) * 0.75;
            assert!(both >= floor - 1e-9 && both <= ceil + 1e-9, "got {both}");
        }
    }

    fn plain_team() -> crate::models::Team {
        crate::models::Team {
            name: "T".into(),
            charter: true,
            status: HashSet::new(),
            characteristics: HashSet::new(),
            design: crate::models::DrivingStyle::Balanced,
            performance: 60.0,
            aero: 50.0,
            gearbox: 50.0,
            suspension: 50.0,
            brakes: 50.0,
            power: 60.0,
            reliability: 0.9,
            engine_reliability: 0.9,
            wear: 0.0,
            engineer: crate::models::CrewTier::Fair,
            pitcrew: crate::models::CrewTier::Fair,
            strategist: crate::models::CrewTier::Fair,
            supplier: "".into(),
            sponsor: "".into(),
            drivers: vec![],
        }
    }

    #[test]
    fn stormy_weather_multiplies_rare_days() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let team = plain_team();
        let event = test_event(CircuitType::GrandPrix);
        let rules = SeriesRules {
            name: "Other Series".into(),
            points: Default::default(),
            playoffs: None,
            practice_sessions: 3,
            retirement_threshold: 0.525,
            premier_series: false,
        };
        let count = |weather: Weather, rng: &mut ChaCha8Rng| {
            let ctx = EventContext {
                event: &event,
                weather,
                discipline: crate::models::Discipline::OpenWheel,
                rules: &rules,
                season_length: 16,
            };
            (0..4000)
                .filter(|_| {
                    let f = roll_session_form(50.0, &team, &ctx, rng);
                    f.fantastic || f.shocking
                })
                .count()
        };
        let clear = count(Weather::Clear, &mut rng);
        let stormy = count(Weather::Stormy, &mut rng);
        assert!(stormy > clear * 2, "clear {} stormy {}", clear, stormy);
    }

    #[test]
    fn fantastic_and_shocking_can_land_together() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let team = plain_team();
        let event = test_event(CircuitType::GrandPrix);
        let rules = SeriesRules {
            name: "Other Series".into(),
            points: Default::default(),
            playoffs: None,
            practice_sessions: 3,
            retirement_threshold: 0.525,
            premier_series: false,
        };
        let ctx = EventContext {
            event: &event,
            weather: Weather::Stormy,
            discipline: crate::models::Discipline::OpenWheel,
            rules: &rules,
            season_length: 16,
        };
        let both = (0..30_000)
            .filter(|_| {
                let f = roll_session_form(50.0, &team, &ctx, &mut rng);
                f.fantastic && f.shocking
            })
            .count();
        assert!(both > 20, "both-flag sessions: {both}");
    }
}
