//! OpenMeteo client
//!
//! Implements both provider traits against the key-less OpenMeteo forecast
//! and geocoding APIs. Units are requested in °F and mph, times in the
//! location's own timezone.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{ForecastProvider, Geocoder, HourlyForecast};
use crate::config::WeatherConfig;
use crate::models::Location;
use crate::{LayerupError, Result};

const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation_probability,wind_speed_10m,relative_humidity_2m,weather_code";

/// Forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: Option<HourlyData>,
}

/// Hourly weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct HourlyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m", default)]
    temperature: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(rename = "wind_speed_10m", default)]
    wind_speed: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m", default)]
    relative_humidity: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<u8>>,
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        let name = match result.admin1 {
            Some(region) if !region.is_empty() && region != result.name => {
                format!("{}, {}", result.name, region)
            }
            _ => result.name,
        };
        Location {
            latitude: result.latitude,
            longitude: result.longitude,
            name,
            country: result.country,
        }
    }
}

impl TryFrom<HourlyData> for HourlyForecast {
    type Error = LayerupError;

    fn try_from(hourly: HourlyData) -> Result<Self> {
        let times = hourly
            .time
            .iter()
            .map(|t| {
                NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M").map_err(|e| {
                    LayerupError::provider(format!("Invalid forecast timestamp '{t}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(HourlyForecast {
            times,
            temperature_f: hourly.temperature,
            wind_speed_mph: hourly.wind_speed,
            precipitation_probability_pct: hourly.precipitation_probability,
            humidity_pct: hourly.relative_humidity,
            weather_code: hourly.weather_code,
        })
    }
}

/// HTTP client for the OpenMeteo APIs
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_base_url: String,
    geocoding_base_url: String,
    forecast_days: u8,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("layerup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LayerupError::provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            forecast_base_url: config.forecast_base_url.trim_end_matches('/').to_string(),
            geocoding_base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LayerupError::provider(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LayerupError::provider(format!(
                "Provider returned HTTP {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LayerupError::provider(format!("Unexpected response shape: {e}")))
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Vec<Location>> {
        let start_time = Instant::now();
        let url = format!(
            "{}/search?name={}&count=5&language=en&format=json",
            self.geocoding_base_url,
            urlencoding::encode(query)
        );

        let response: GeocodingResponse = self.get_json(&url).await?;
        let locations: Vec<Location> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        if locations.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            info!(
                "Found {} geocoding results for '{}' in {:.3}s",
                locations.len(),
                query,
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(locations)
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(location = %location.name))]
    async fn hourly_forecast(&self, location: &Location) -> Result<HourlyForecast> {
        let start_time = Instant::now();
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&hourly={}&temperature_unit=fahrenheit&wind_speed_unit=mph&timezone=auto&forecast_days={}",
            self.forecast_base_url,
            location.latitude,
            location.longitude,
            HOURLY_FIELDS,
            self.forecast_days
        );
        debug!("OpenMeteo forecast request URL: {}", url);

        let response: ForecastResponse = self.get_json(&url).await?;
        let hourly = response
            .hourly
            .ok_or_else(|| LayerupError::provider("Forecast response has no hourly data"))?;
        let forecast = HourlyForecast::try_from(hourly)?;

        debug!(
            "Retrieved {} hourly slots in {:.3}s",
            forecast.times.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoding_result_name_includes_region() {
        let result = GeocodingResult {
            name: "Boulder".to_string(),
            latitude: 40.015,
            longitude: -105.271,
            country: Some("United States".to_string()),
            admin1: Some("Colorado".to_string()),
        };
        let location = Location::from(result);
        assert_eq!(location.name, "Boulder, Colorado");
        assert_eq!(location.country.as_deref(), Some("United States"));
    }

    #[test]
    fn test_hourly_conversion_rejects_bad_timestamps() {
        let hourly = HourlyData {
            time: vec!["yesterday".to_string()],
            temperature: vec![Some(50.0)],
            precipitation_probability: vec![Some(0.0)],
            wind_speed: vec![Some(3.0)],
            relative_humidity: vec![Some(60.0)],
            weather_code: vec![Some(0)],
        };
        assert!(matches!(
            HourlyForecast::try_from(hourly),
            Err(LayerupError::Provider { .. })
        ));
    }

    #[test]
    fn test_hourly_response_with_nulls_deserializes() {
        let json = r#"{
            "hourly": {
                "time": ["2026-10-20T07:00", "2026-10-20T08:00"],
                "temperature_2m": [41.2, null],
                "precipitation_probability": [10, 20],
                "wind_speed_10m": [4.5, 6.1],
                "relative_humidity_2m": [70, 65],
                "weather_code": [1, 3]
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        let forecast = HourlyForecast::try_from(response.hourly.unwrap()).unwrap();
        assert_eq!(forecast.times.len(), 2);
        assert_eq!(forecast.temperature_f, vec![Some(41.2), None]);
        assert_eq!(forecast.precipitation_probability_pct, vec![Some(10.0), Some(20.0)]);
    }
}
