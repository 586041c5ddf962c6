//! Location model for geographic coordinates and metadata

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RoutePoint;

/// A named coordinate pair, either geocoded or taken from a route point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, route point label)
    pub name: String,
    /// Country name as reported by the geocoder
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            country: None,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Cache key for a forecast window starting at `start` at this location
    #[must_use]
    pub fn forecast_cache_key(&self, start: NaiveDateTime) -> String {
        let (lat, lon) = self.rounded_coordinates(3);
        format!("forecast:{lat:.3}:{lon:.3}:{}", start.format("%Y-%m-%dT%H:%M"))
    }
}

impl From<&RoutePoint> for Location {
    fn from(point: &RoutePoint) -> Self {
        Location::new(point.latitude, point.longitude, point.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_forecast_cache_key() {
        let location = Location::new(40.014_986, -105.270_546, "Boulder".to_string());
        let start = NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        assert_eq!(
            location.forecast_cache_key(start),
            "forecast:40.015:-105.271:2026-10-20T07:30"
        );
    }

    #[test]
    fn test_location_rounded_coordinates() {
        let location = Location::new(46.818_234, 8.227_456, "Test".to_string());
        let (lat, lon) = location.rounded_coordinates(2);
        assert_eq!(lat, 46.82);
        assert_eq!(lon, 8.23);
    }

    #[test]
    fn test_from_route_point_keeps_label() {
        let point = RoutePoint::new(45.0, 6.0, "Col du Galibier".to_string(), 3);
        let location = Location::from(&point);
        assert_eq!(location.name, "Col du Galibier");
        assert_eq!(location.format_coordinates(), "45.0000, 6.0000");
    }
}
