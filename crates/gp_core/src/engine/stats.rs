//! Derived statistics and the event record: lap and race times,
//! fastest lap, laps led, positions gained.

use crate::models::DnfReason;
use rand::Rng;

/// Format a time in seconds as `m:ss.xx`.
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{}:{:05.2}", minutes, rest)
}

/// Qualifying lap from the session score: a stronger lap cuts more
/// off the base time, but never adds to it.
pub fn qualifying_lap_time(base_time: f64, score: f64) -> f64 {
    base_time - (0.05 * score).max(0.0)
}

/// Total race time for a classified finisher.
pub fn race_time(base_time: f64, score: f64, laps: u32) -> f64 {
    (base_time - 0.05 * score) * laps as f64
}

/// One finisher's best lap of the race. `position_factor` runs 0.0
/// for the winner to 1.0 for the last finisher, so the front of the
/// field sets the quicker laps.
pub fn fastest_lap_time(
    base_time: f64,
    score: f64,
    position_factor: f64,
    rng: &mut impl Rng,
) -> f64 {
    base_time + position_factor * 5.0 - 0.05 * score + rng.gen_range(0.0..30.0)
}

/// Laps led estimate for one finisher, clamped to the race distance.
/// Same `position_factor` convention: the winner gets the largest
/// baseline.
pub fn laps_led(laps: u32, score: f64, position_factor: f64, rng: &mut impl Rng) -> u32 {
    let estimate = (1.0 - position_factor) * (laps as f64 / 4.0) + (0.05 * score) / 10.0
        - rng.gen_range(-15.0..60.0);
    estimate.clamp(0.0, laps as f64).round() as u32
}

// ============================================================================
// Event record
// ============================================================================

/// A row of the qualifying classification.
#[derive(Debug, Clone)]
pub struct QualRow {
    pub driver: String,
    pub team: String,
    pub supplier: String,
    pub sponsor: String,
    pub time: f64,
    pub score: f64,
}

/// A classified finisher.
#[derive(Debug, Clone)]
pub struct FinisherRecord {
    pub position: usize,
    pub driver: String,
    pub team: String,
    pub supplier: String,
    pub sponsor: String,
    pub grid_pos: usize,
    pub score: f64,
    pub time: f64,
    pub fastest_lap: f64,
    pub laps_led: u32,
}

#[derive(Debug, Clone)]
pub struct DnfRecord {
    pub driver: String,
    pub team: String,
    pub supplier: String,
    pub sponsor: String,
    pub reason: DnfReason,
}

/// Everything one event produced; the input to standings aggregation
/// and to the result JSON.
#[derive(Debug, Clone)]
pub struct RaceRecord {
    pub series: String,
    pub circuit: String,
    pub round: u32,
    pub qualifying: Vec<QualRow>,
    pub dnq: Vec<QualRow>,
    pub finishers: Vec<FinisherRecord>,
    pub dnfs: Vec<DnfRecord>,
    pub fastest_lap: Option<(String, f64)>,
    pub most_laps_led: Option<(String, u32)>,
    pub most_positions_gained: Option<(String, i64)>,
}

impl RaceRecord {
    /// Name of the pole sitter, when qualifying produced one.
    pub fn pole_sitter(&self) -> Option<&str> {
        self.qualifying.first().map(|row| row.driver.as_str())
    }

    /// Fill the headline stats from the classified finishers.
    pub fn derive_headlines(&mut self) {
        self.fastest_lap = self
            .finishers
            .iter()
            .min_by(|a, b| a.fastest_lap.total_cmp(&b.fastest_lap))
            .map(|f| (f.driver.clone(), f.fastest_lap));
        self.most_laps_led = self
            .finishers
            .iter()
            .max_by_key(|f| f.laps_led)
            .filter(|f| f.laps_led > 0)
            .map(|f| (f.driver.clone(), f.laps_led));
        self.most_positions_gained = self
            .finishers
            .iter()
            .map(|f| (f.driver.clone(), f.grid_pos as i64 - f.position as i64))
            .max_by_key(|(_, gained)| *gained)
            .filter(|(_, gained)| *gained > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(92.5), "1:32.50");
        assert_eq!(format_time(59.99), "0:59.99");
        assert_eq!(format_time(125.041), "2:05.04");
    }

    #[test]
    fn stronger_lap_is_faster_but_never_slower_than_base() {
        assert!(qualifying_lap_time(90.0, 200.0) < qualifying_lap_time(90.0, 100.0));
        assert_eq!(qualifying_lap_time(90.0, -50.0), 90.0);
    }

    #[test]
    fn laps_led_stays_within_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let led = laps_led(60, 300.0, 0.2, &mut rng);
            assert!(led <= 60);
        }
    }

    #[test]
    fn winner_leads_more_laps_than_the_tail_on_average() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let mut front = 0u32;
        let mut back = 0u32;
        for _ in 0..2000 {
            front += laps_led(200, 300.0, 0.0, &mut rng);
            back += laps_led(200, 300.0, 1.0, &mut rng);
        }
        assert!(front > back * 2, "front {} back {}", front, back);
    }

    #[test]
    fn winner_sets_the_quicker_laps_on_average() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut front = 0.0;
        let mut back = 0.0;
        for _ in 0..2000 {
            front += fastest_lap_time(90.0, 300.0, 0.0, &mut rng);
            back += fastest_lap_time(90.0, 300.0, 1.0, &mut rng);
        }
        assert!(front < back, "front {} back {}", front, back);
    }

    fn finisher(name: &str, position: usize, grid: usize, fastest: f64, led: u32) -> FinisherRecord {
        FinisherRecord {
            position,
            driver: name.into(),
            team: "T".into(),
            supplier: "".into(),
            sponsor: "".into(),
            grid_pos: grid,
            score: 100.0,
            time: 5000.0,
            fastest_lap: fastest,
            laps_led: led,
        }
    }

    #[test]
    fn headlines_pick_the_right_drivers() {
        let mut record = RaceRecord {
            series: "S".into(),
            circuit: "C".into(),
            round: 1,
            qualifying: vec![],
            dnq: vec![],
            finishers: vec![
                finisher("A", 1, 4, 91.2, 30),
                finisher("B", 2, 1, 90.4, 25),
                finisher("C", 3, 8, 92.8, 0),
            ],
            dnfs: vec![],
            fastest_lap: None,
            most_laps_led: None,
            most_positions_gained: None,
        };
        record.derive_headlines();
        assert_eq!(record.fastest_lap.as_ref().unwrap().0, "B");
        assert_eq!(record.most_laps_led, Some(("A".into(), 30)));
        assert_eq!(record.most_positions_gained, Some(("C".into(), 5)));
    }

    #[test]
    fn no_gain_means_no_headline() {
        let mut record = RaceRecord {
            series: "S".into(),
            circuit: "C".into(),
            round: 1,
            qualifying: vec![],
            dnq: vec![],
            finishers: vec![finisher("A", 1, 1, 91.0, 0)],
            dnfs: vec![],
            fastest_lap: None,
            most_laps_led: None,
            most_positions_gained: None,
        };
        record.derive_headlines();
        assert!(record.most_positions_gained.is_none());
        assert!(record.most_laps_led.is_none());
    }
}
