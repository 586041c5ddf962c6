//! Generated forecast conditions used when the provider cannot answer

use chrono::{NaiveDateTime, TimeDelta};
use rand::RngExt;

use super::FORECAST_HOURS;
use crate::models::ForecastSample;

const BASELINE_RANGE_F: std::ops::RangeInclusive<f64> = 50.0..=80.0;
const JITTER_F: f64 = 3.0;

/// [`FORECAST_HOURS`] plausible hourly samples starting at `start`
#[must_use]
pub fn generate(label: &str, start: NaiveDateTime) -> Vec<ForecastSample> {
    generate_with(&mut rand::rng(), label, start)
}

/// Same as [`generate`], drawing from the given generator
pub fn generate_with<R: RngExt + ?Sized>(
    rng: &mut R,
    label: &str,
    start: NaiveDateTime,
) -> Vec<ForecastSample> {
    let baseline = rng.random_range(BASELINE_RANGE_F);

    (0..FORECAST_HOURS)
        .map(|i| ForecastSample {
            location_label: label.to_string(),
            timestamp: start + TimeDelta::hours(i as i64),
            temperature_f: round1(baseline + rng.random_range(-JITTER_F..=JITTER_F)),
            wind_speed_mph: round1(rng.random_range(5.0..=20.0)),
            precipitation_probability_pct: rng.random_range(0..=100),
            humidity_pct: rng.random_range(40..=80),
            weather_code: rng.random_range(0..=3),
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(6, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        for _ in 0..50 {
            let samples = generate("Offline", start());
            assert_eq!(samples.len(), FORECAST_HOURS);
            for sample in &samples {
                assert!((47.0..=83.0).contains(&sample.temperature_f));
                assert!((5.0..=20.0).contains(&sample.wind_speed_mph));
                assert!(sample.precipitation_probability_pct <= 100);
                assert!((40..=80).contains(&sample.humidity_pct));
                assert!(sample.weather_code <= 3);
                assert_eq!(sample.location_label, "Offline");
            }
        }
    }

    #[test]
    fn test_timestamps_step_hourly_from_start() {
        let samples = generate("Offline", start());
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.timestamp, start() + TimeDelta::hours(i as i64));
        }
    }

    #[test]
    fn test_hourly_temperatures_share_a_baseline() {
        let samples = generate("Offline", start());
        let min = samples.iter().map(|s| s.temperature_f).fold(f64::MAX, f64::min);
        let max = samples.iter().map(|s| s.temperature_f).fold(f64::MIN, f64::max);
        assert!(max - min <= 2.0 * JITTER_F + 0.1);
    }

    #[test]
    fn test_seeded_generator_repeats() {
        let first = generate_with(&mut StdRng::seed_from_u64(7), "Offline", start());
        let second = generate_with(&mut StdRng::seed_from_u64(7), "Offline", start());
        assert_eq!(first, second);
    }
}
