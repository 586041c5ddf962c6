//! Forecast sample models and the series wrapping them

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hourly forecast slot for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSample {
    pub location_label: String,
    /// Local time of the slot at the forecast location
    pub timestamp: NaiveDateTime,
    pub temperature_f: f64,
    pub wind_speed_mph: f64,
    /// Probability of precipitation (0-100)
    pub precipitation_probability_pct: u8,
    /// Relative humidity (0-100)
    pub humidity_pct: u8,
    /// WMO weather interpretation code
    pub weather_code: u8,
}

impl ForecastSample {
    #[must_use]
    pub fn description(&self) -> &'static str {
        weather_code_to_description(self.weather_code)
    }
}

/// Per-hour summary across several route points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedForecastSample {
    pub timestamp: NaiveDateTime,
    pub temperature_min_f: f64,
    pub temperature_max_f: f64,
    /// Rounded midpoint of min and max
    pub temperature_representative_f: f64,
    /// Worst case across points
    pub wind_speed_mph: f64,
    /// Worst case across points
    pub precipitation_probability_pct: u8,
    /// Rounded mean across points
    pub humidity_pct: u8,
    pub weather_code: u8,
    pub aggregated: bool,
}

impl AggregatedForecastSample {
    #[must_use]
    pub fn description(&self) -> &'static str {
        weather_code_to_description(self.weather_code)
    }
}

/// Forecast samples handed to the recommendation engine.
///
/// The variant decides how the base temperature is derived: single-location
/// samples are averaged, aggregated samples use the coldest point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "samples", rename_all = "snake_case")]
pub enum ForecastSeries {
    Single(Vec<ForecastSample>),
    Aggregated(Vec<AggregatedForecastSample>),
}

impl ForecastSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ForecastSeries::Single(samples) => samples.len(),
            ForecastSeries::Aggregated(samples) => samples.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_aggregated(&self) -> bool {
        matches!(self, ForecastSeries::Aggregated(_))
    }

    /// Wind speed of every slot, in slot order
    #[must_use]
    pub fn wind_speeds(&self) -> Vec<f64> {
        match self {
            ForecastSeries::Single(samples) => samples.iter().map(|s| s.wind_speed_mph).collect(),
            ForecastSeries::Aggregated(samples) => {
                samples.iter().map(|s| s.wind_speed_mph).collect()
            }
        }
    }

    /// Precipitation probability of every slot, in slot order
    #[must_use]
    pub fn precipitation_probabilities(&self) -> Vec<u8> {
        match self {
            ForecastSeries::Single(samples) => samples
                .iter()
                .map(|s| s.precipitation_probability_pct)
                .collect(),
            ForecastSeries::Aggregated(samples) => samples
                .iter()
                .map(|s| s.precipitation_probability_pct)
                .collect(),
        }
    }
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(temperature_f: f64, wind_speed_mph: f64, precip: u8) -> ForecastSample {
        ForecastSample {
            location_label: "Boulder".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2026, 10, 20)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            temperature_f,
            wind_speed_mph,
            precipitation_probability_pct: precip,
            humidity_pct: 50,
            weather_code: 61,
        }
    }

    #[test]
    fn test_series_accessors() {
        let series = ForecastSeries::Single(vec![sample(40.0, 5.0, 10), sample(42.0, 12.0, 45)]);
        assert_eq!(series.len(), 2);
        assert!(!series.is_aggregated());
        assert_eq!(series.wind_speeds(), vec![5.0, 12.0]);
        assert_eq!(series.precipitation_probabilities(), vec![10, 45]);
    }

    #[test]
    fn test_series_json_shape() {
        let series = ForecastSeries::Single(vec![sample(40.0, 5.0, 10)]);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["samples"][0]["temperatureF"], 40.0);
        assert_eq!(json["samples"][0]["precipitationProbabilityPct"], 10);
        assert_eq!(json["samples"][0]["timestamp"], "2026-10-20T08:00:00");
    }

    #[test]
    fn test_weather_description() {
        assert_eq!(sample(40.0, 5.0, 10).description(), "Slight rain");
        assert_eq!(weather_code_to_description(200), "Unknown");
    }
}
