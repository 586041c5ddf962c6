//! Merging per-point forecasts into one series

use crate::models::{AggregatedForecastSample, ForecastSample};

/// Combine forecasts for several route points hour by hour.
///
/// Only hours present for every point are kept. Temperatures report the
/// spread, wind and precipitation the worst point, humidity the mean.
/// Timestamp and weather code come from the first point.
#[must_use]
pub fn aggregate(per_point: &[Vec<ForecastSample>]) -> Vec<AggregatedForecastSample> {
    let slots = per_point.iter().map(Vec::len).min().unwrap_or(0);

    (0..slots)
        .map(|slot| {
            let samples: Vec<&ForecastSample> =
                per_point.iter().map(|point| &point[slot]).collect();
            let first = samples[0];

            let temperature_min_f = samples
                .iter()
                .map(|s| s.temperature_f)
                .fold(f64::INFINITY, f64::min);
            let temperature_max_f = samples
                .iter()
                .map(|s| s.temperature_f)
                .fold(f64::NEG_INFINITY, f64::max);
            let wind_speed_mph = samples
                .iter()
                .map(|s| s.wind_speed_mph)
                .fold(f64::NEG_INFINITY, f64::max);
            let precipitation_probability_pct = samples
                .iter()
                .map(|s| s.precipitation_probability_pct)
                .max()
                .unwrap_or_default();
            let humidity_sum: f64 = samples.iter().map(|s| f64::from(s.humidity_pct)).sum();
            let humidity_pct = (humidity_sum / samples.len() as f64).round() as u8;

            AggregatedForecastSample {
                timestamp: first.timestamp,
                temperature_min_f,
                temperature_max_f,
                temperature_representative_f: ((temperature_min_f + temperature_max_f) / 2.0)
                    .round(),
                wind_speed_mph,
                precipitation_probability_pct,
                humidity_pct,
                weather_code: first.weather_code,
                aggregated: true,
            }
        })
        .collect()
}
