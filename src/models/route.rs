//! Route point model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single point of a route as read from a track file.
///
/// Points are ordered by `sequence_index` and never modified after the track
/// reader produces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Human-readable name used as the forecast location label
    pub label: String,
    pub sequence_index: usize,
    #[serde(default)]
    pub is_waypoint: bool,
}

impl RoutePoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, label: String, sequence_index: usize) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            timestamp: None,
            label,
            sequence_index,
            is_waypoint: false,
        }
    }
}
