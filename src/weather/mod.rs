//! Weather and geocoding collaborators
//!
//! The providers are traits so the planner can run against OpenMeteo in
//! production and against stubs in tests.

pub mod aggregate;
pub mod fetcher;
pub mod mock;
pub mod open_meteo;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::Result;
use crate::models::Location;

pub use aggregate::aggregate;
pub use fetcher::{FORECAST_HOURS, ForecastFetcher};
pub use open_meteo::OpenMeteoClient;

/// Raw hourly arrays as returned by a forecast provider.
///
/// All value arrays are parallel to `times`; a `None` marks a slot the
/// provider had no value for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyForecast {
    /// Local times at the forecast location
    pub times: Vec<NaiveDateTime>,
    pub temperature_f: Vec<Option<f64>>,
    pub wind_speed_mph: Vec<Option<f64>>,
    pub precipitation_probability_pct: Vec<Option<f64>>,
    pub humidity_pct: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u8>>,
}

/// Resolves free text to candidate locations, best match first
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Vec<Location>>;
}

/// Supplies hourly forecast arrays for a coordinate
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn hourly_forecast(&self, location: &Location) -> Result<HourlyForecast>;
}
