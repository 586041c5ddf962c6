//! Forecast fetching with offline fallback
//!
//! A fetch always yields [`FORECAST_HOURS`] samples: the provider's values
//! when they can be resolved for the requested window, generated conditions
//! otherwise.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use rand::RngExt;
use tracing::{debug, instrument, warn};

use super::{ForecastProvider, HourlyForecast, mock};
use crate::cache;
use crate::models::{ForecastSample, Location};
use crate::{LayerupError, Result};

/// Number of hourly slots in every forecast window
pub const FORECAST_HOURS: usize = 5;

/// Fetches forecast windows for single coordinates
#[derive(Clone)]
pub struct ForecastFetcher {
    provider: Arc<dyn ForecastProvider>,
    cache_ttl: Option<Duration>,
}

impl ForecastFetcher {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self {
            provider,
            cache_ttl: None,
        }
    }

    /// Keep provider results in the global cache for roughly `ttl`
    #[must_use]
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Forecast window of [`FORECAST_HOURS`] hourly samples starting at `start`.
    ///
    /// Never fails: provider errors and unresolvable windows fall back to
    /// generated conditions.
    #[instrument(skip(self), fields(location = %location.name))]
    pub async fn fetch(&self, location: &Location, start: NaiveDateTime) -> Vec<ForecastSample> {
        let key = location.forecast_cache_key(start);
        if let Some(mut samples) = self.cached(&key).await {
            debug!("Using cached forecast for {}", location.name);
            // Entries are keyed by coordinate; the label belongs to this caller
            for sample in &mut samples {
                sample.location_label.clone_from(&location.name);
            }
            return samples;
        }

        match self.fetch_live(location, start).await {
            Ok(samples) => {
                self.store(&key, &samples).await;
                samples
            }
            Err(e) => {
                warn!(
                    "Forecast for {} unavailable ({}), using generated conditions",
                    location.name, e
                );
                mock::generate(&location.name, start)
            }
        }
    }

    async fn fetch_live(
        &self,
        location: &Location,
        start: NaiveDateTime,
    ) -> Result<Vec<ForecastSample>> {
        let hourly = self.provider.hourly_forecast(location).await?;
        resolve_window(&hourly, start, &location.name)
    }

    async fn cached(&self, key: &str) -> Option<Vec<ForecastSample>> {
        if self.cache_ttl.is_none() || !cache::is_initialized() {
            return None;
        }
        match cache::get::<Vec<ForecastSample>>(key).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Forecast cache lookup failed: {}", e);
                None
            }
        }
    }

    async fn store(&self, key: &str, samples: &[ForecastSample]) {
        let Some(ttl) = self.cache_ttl else {
            return;
        };
        if !cache::is_initialized() {
            return;
        }
        // Spread expiry so entries written together do not all lapse together
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        let ttl = ttl.mul_f64(jitter);
        if let Err(e) = cache::put(key, samples.to_vec(), ttl).await {
            warn!("Failed to cache forecast: {}", e);
        }
    }
}

/// Pick the provider slots covering `start`, `start + 1h`, ...
///
/// Each slot is the first one at or after the wanted time. A missing slot or
/// value fails the whole window.
pub fn resolve_window(
    hourly: &HourlyForecast,
    start: NaiveDateTime,
    label: &str,
) -> Result<Vec<ForecastSample>> {
    (0..FORECAST_HOURS)
        .map(|i| {
            let wanted = start + TimeDelta::hours(i as i64);
            let index = hourly
                .times
                .iter()
                .position(|t| *t >= wanted)
                .ok_or_else(|| {
                    LayerupError::provider(format!("No forecast slot at or after {wanted}"))
                })?;
            let timestamp = hourly.times[index];

            Ok(ForecastSample {
                location_label: label.to_string(),
                timestamp,
                temperature_f: value_at(&hourly.temperature_f, index, "temperature")?,
                wind_speed_mph: value_at(&hourly.wind_speed_mph, index, "wind speed")?,
                precipitation_probability_pct: to_pct(value_at(
                    &hourly.precipitation_probability_pct,
                    index,
                    "precipitation probability",
                )?),
                humidity_pct: to_pct(value_at(&hourly.humidity_pct, index, "humidity")?),
                weather_code: value_at(&hourly.weather_code, index, "weather code")?,
            })
        })
        .collect()
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize, field: &str) -> Result<T> {
    values
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| LayerupError::provider(format!("Missing {field} at slot {index}")))
}

fn to_pct(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
