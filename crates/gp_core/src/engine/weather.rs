//! Per-event weather sampling from the schedule's probability vector.

use crate::models::{Weather, WeatherOdds};
use rand::Rng;

/// Sample the event weather. Weights are relative; a degenerate vector
/// (all zero or negative) falls back to clear conditions.
pub fn sample_weather(odds: &WeatherOdds, rng: &mut impl Rng) -> Weather {
    let weights = [
        (Weather::Clear, odds.clear.max(0.0)),
        (Weather::Rainy, odds.rainy.max(0.0)),
        (Weather::Overcast, odds.overcast.max(0.0)),
        (Weather::Hot, odds.hot.max(0.0)),
        (Weather::Stormy, odds.stormy.max(0.0)),
    ];
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return Weather::Clear;
    }
    let mut roll = rng.gen_range(0.0..total);
    for (weather, weight) in weights {
        if roll < weight {
            return weather;
        }
        roll -= weight;
    }
    Weather::Clear
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn degenerate_vector_falls_back_to_clear() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let odds = WeatherOdds::default();
        assert_eq!(sample_weather(&odds, &mut rng), Weather::Clear);
    }

    #[test]
    fn certain_weather_always_sampled() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let odds = WeatherOdds {
            stormy: 3.0,
            ..WeatherOdds::default()
        };
        for _ in 0..50 {
            assert_eq!(sample_weather(&odds, &mut rng), Weather::Stormy);
        }
    }

    #[test]
    fn mixed_vector_hits_every_bucket() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let odds = WeatherOdds {
            clear: 0.4,
            rainy: 0.2,
            overcast: 0.2,
            hot: 0.1,
            stormy: 0.1,
        };
        let mut seen_rain = false;
        let mut seen_clear = false;
        for _ in 0..500 {
            match sample_weather(&odds, &mut rng) {
                Weather::Rainy => seen_rain = true,
                Weather::Clear => seen_clear = true,
                _ => {}
            }
        }
        assert!(seen_rain && seen_clear);
    }
}
