//! Layering recommendations
//!
//! Turns a forecast series, an activity and an effort level into an ordered
//! list of clothing and gear items. The derivation is a pure function of its
//! inputs.

pub mod tables;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;
use crate::models::{Activity, Effort, ForecastSeries, LayerItem};

pub use tables::{Band, LayeringTable, LayeringTables, WindRule};

/// Felt temperature rises by this many °F per unit of heat factor above 1.0
const EFFORT_SPREAD_F: f64 = 15.0;

/// Precipitation probability (%) above which rain gear is added
const RAIN_PROBABILITY_PCT: u8 = 30;

/// Conditions the layering tables are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub base_temperature_f: f64,
    pub felt_temperature_f: f64,
    pub max_wind_mph: f64,
    pub has_rain: bool,
}

impl Conditions {
    /// Derive conditions from a forecast; `None` for an empty series.
    ///
    /// A single-location series uses its mean temperature. An aggregated
    /// series uses the coldest minimum, since someone on the route will be
    /// standing at that point.
    #[must_use]
    pub fn from_series(series: &ForecastSeries, effort: Effort) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let base_temperature_f = match series {
            ForecastSeries::Single(samples) => {
                samples.iter().map(|s| s.temperature_f).sum::<f64>() / samples.len() as f64
            }
            ForecastSeries::Aggregated(samples) => samples
                .iter()
                .map(|s| s.temperature_min_f)
                .fold(f64::INFINITY, f64::min),
        };
        let felt_temperature_f =
            base_temperature_f + (effort.heat_factor() - 1.0) * EFFORT_SPREAD_F;
        let max_wind_mph = series
            .wind_speeds()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        let has_rain = series
            .precipitation_probabilities()
            .into_iter()
            .any(|p| p > RAIN_PROBABILITY_PCT);

        Some(Conditions {
            base_temperature_f,
            felt_temperature_f,
            max_wind_mph,
            has_rain,
        })
    }
}

/// Applies the layering tables to forecasts
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    tables: LayeringTables,
}

impl RecommendationEngine {
    #[must_use]
    pub fn new(tables: LayeringTables) -> Self {
        Self { tables }
    }

    /// Engine over the tables shipped with the crate
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(LayeringTables::builtin()?))
    }

    #[must_use]
    pub fn tables(&self) -> &LayeringTables {
        &self.tables
    }

    /// Recommend layers for an activity given by id.
    ///
    /// Unknown activities produce no items rather than an error.
    #[must_use]
    pub fn recommend(&self, activity_id: &str, series: &ForecastSeries, effort: Effort) -> Vec<LayerItem> {
        match Activity::from_id(activity_id) {
            Some(activity) => self.recommend_activity(activity, series, effort),
            None => {
                warn!("Unknown activity '{}', no layers recommended", activity_id);
                Vec::new()
            }
        }
    }

    #[must_use]
    pub fn recommend_activity(
        &self,
        activity: Activity,
        series: &ForecastSeries,
        effort: Effort,
    ) -> Vec<LayerItem> {
        match Conditions::from_series(series, effort) {
            Some(conditions) => self.recommend_for_conditions(activity, &conditions),
            None => {
                debug!("Empty forecast for {}, no layers recommended", activity);
                Vec::new()
            }
        }
    }

    #[must_use]
    pub fn recommend_for_conditions(&self, activity: Activity, conditions: &Conditions) -> Vec<LayerItem> {
        debug!(
            "{} at felt {:.1}°F (base {:.1}°F), wind up to {:.1} mph, rain: {}",
            activity,
            conditions.felt_temperature_f,
            conditions.base_temperature_f,
            conditions.max_wind_mph,
            conditions.has_rain
        );
        self.tables.table(activity).items_for(
            conditions.felt_temperature_f,
            conditions.max_wind_mph,
            conditions.has_rain,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregatedForecastSample, ForecastSample};
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use rstest::rstest;

    fn hour(i: usize) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
            + TimeDelta::hours(i as i64)
    }

    fn single(temps: &[f64], wind: f64, precip: u8) -> ForecastSeries {
        ForecastSeries::Single(
            temps
                .iter()
                .enumerate()
                .map(|(i, t)| ForecastSample {
                    location_label: "Boulder".to_string(),
                    timestamp: hour(i),
                    temperature_f: *t,
                    wind_speed_mph: wind,
                    precipitation_probability_pct: precip,
                    humidity_pct: 50,
                    weather_code: 0,
                })
                .collect(),
        )
    }

    fn aggregated(mins: &[f64], winds: &[f64]) -> ForecastSeries {
        ForecastSeries::Aggregated(
            mins.iter()
                .zip(winds)
                .enumerate()
                .map(|(i, (min, wind))| AggregatedForecastSample {
                    timestamp: hour(i),
                    temperature_min_f: *min,
                    temperature_max_f: min + 4.0,
                    temperature_representative_f: min + 2.0,
                    wind_speed_mph: *wind,
                    precipitation_probability_pct: 10,
                    humidity_pct: 55,
                    weather_code: 2,
                    aggregated: true,
                })
                .collect(),
        )
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::builtin().unwrap()
    }

    #[test]
    fn test_run_easy_in_the_cold() {
        let series = single(&[20.0; 5], 5.0, 0);
        let conditions = Conditions::from_series(&series, Effort::Easy).unwrap();
        assert!((conditions.felt_temperature_f - 15.5).abs() < 1e-9);

        let items = engine().recommend("run", &series, Effort::Easy);
        assert_eq!(
            items,
            vec![
                LayerItem::new("base", "Thermal long-sleeve base layer", "Keeps skin warm and dry below freezing"),
                LayerItem::new("outer", "Insulated running jacket", "Traps heat while still venting sweat"),
                LayerItem::new("legs", "Thermal tights", "Brushed lining holds warmth in the legs"),
                LayerItem::new("hands", "Running gloves", "Fingers lose heat first in the cold"),
                LayerItem::new("head", "Warm beanie", "Covers ears against freezing air"),
            ]
        );
    }

    #[test]
    fn test_road_bike_tempo_on_aggregated_route() {
        let series = aggregated(&[30.0, 28.0, 29.0, 31.0, 30.0], &[10.0, 12.0, 20.0, 14.0, 9.0]);
        let conditions = Conditions::from_series(&series, Effort::Tempo).unwrap();
        assert_eq!(conditions.base_temperature_f, 28.0);
        assert!((conditions.felt_temperature_f - 32.5).abs() < 1e-9);
        assert_eq!(conditions.max_wind_mph, 20.0);
        assert!(!conditions.has_rain);

        let items = engine().recommend("road-bike", &series, Effort::Tempo);
        assert_eq!(
            items,
            vec![
                LayerItem::new("base", "Long-sleeve base layer", "Adds warmth without bulk"),
                LayerItem::new("mid", "Long-sleeve thermal jersey", "Warm enough for cold descents"),
                LayerItem::new("legs", "Bib tights", "Keeps knees warm"),
                LayerItem::new("hands", "Full-finger gloves", "Keeps hands working on the brakes"),
                LayerItem::new("feet", "Toe covers", "Blocks air through shoe vents"),
                LayerItem::new("outer", "Wind jacket", "Strong wind adds to riding windchill"),
                LayerItem::new("safety", "Helmet", "Always required on the bike"),
                LayerItem::new("safety", "Cycling glasses", "Protects eyes from debris and wind"),
            ]
        );
    }

    #[test]
    fn test_unknown_activity_yields_nothing() {
        let series = single(&[50.0; 5], 5.0, 0);
        assert!(engine().recommend("kayak", &series, Effort::Easy).is_empty());
    }

    #[test]
    fn test_empty_series_yields_nothing() {
        let series = ForecastSeries::Single(Vec::new());
        assert!(engine().recommend("hike", &series, Effort::Easy).is_empty());
        assert!(Conditions::from_series(&series, Effort::Easy).is_none());
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let series = single(&[38.0, 41.0, 44.0, 46.0, 47.0], 17.0, 45);
        let engine = engine();
        let first = engine.recommend("trail-run", &series, Effort::Endurance);
        for _ in 0..10 {
            assert_eq!(engine.recommend("trail-run", &series, Effort::Endurance), first);
        }
    }

    #[test]
    fn test_single_series_uses_mean_temperature() {
        let series = single(&[40.0, 50.0, 60.0], 0.0, 0);
        let conditions = Conditions::from_series(&series, Effort::Endurance).unwrap();
        assert_eq!(conditions.base_temperature_f, 50.0);
        assert_eq!(conditions.felt_temperature_f, 50.0);
    }

    #[rstest]
    #[case(30, false)]
    #[case(31, true)]
    fn test_rain_threshold(#[case] precip: u8, #[case] expected: bool) {
        let series = single(&[50.0; 5], 0.0, precip);
        let conditions = Conditions::from_series(&series, Effort::Easy).unwrap();
        assert_eq!(conditions.has_rain, expected);
    }

    #[rstest]
    #[case(Effort::Easy, 45.5)]
    #[case(Effort::Endurance, 50.0)]
    #[case(Effort::Tempo, 54.5)]
    #[case(Effort::AllOut, 59.0)]
    fn test_effort_shifts_felt_temperature(#[case] effort: Effort, #[case] felt: f64) {
        let series = single(&[50.0; 5], 0.0, 0);
        let conditions = Conditions::from_series(&series, effort).unwrap();
        assert!((conditions.felt_temperature_f - felt).abs() < 1e-9);
    }
}
