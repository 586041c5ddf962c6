//! GPX track reader
//!
//! Reads tracks, routes and waypoints from a GPX document into one ordered
//! list of [`RoutePoint`]s.

use chrono::{DateTime, Utc};
use haversine::{Location as HaversineLocation, Units, distance};
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::{debug, info};

use super::TrackError;
use crate::models::RoutePoint;

/// GPX structure for deserialization
#[derive(Debug, Deserialize)]
struct GpxDocument {
    #[serde(rename = "wpt", default)]
    waypoints: Vec<GpxPoint>,
    #[serde(rename = "rte", default)]
    routes: Vec<GpxRoute>,
    #[serde(rename = "trk", default)]
    tracks: Vec<GpxTrack>,
}

#[derive(Debug, Deserialize)]
struct GpxTrack {
    name: Option<String>,
    #[serde(rename = "trkseg", default)]
    segments: Vec<GpxSegment>,
}

#[derive(Debug, Deserialize)]
struct GpxSegment {
    #[serde(rename = "trkpt", default)]
    points: Vec<GpxPoint>,
}

#[derive(Debug, Deserialize)]
struct GpxRoute {
    name: Option<String>,
    #[serde(rename = "rtept", default)]
    points: Vec<GpxPoint>,
}

#[derive(Debug, Deserialize)]
struct GpxPoint {
    #[serde(rename = "@lat")]
    lat: f64,
    #[serde(rename = "@lon")]
    lon: f64,
    ele: Option<f64>,
    time: Option<String>,
    name: Option<String>,
}

impl GpxPoint {
    fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    fn into_route_point(self, fallback_label: String, sequence_index: usize) -> RoutePoint {
        let timestamp = self
            .time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t.trim()).ok())
            .map(|t| t.with_timezone(&Utc));
        let label = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback_label);

        RoutePoint {
            latitude: self.lat,
            longitude: self.lon,
            elevation: self.ele,
            timestamp,
            label,
            sequence_index,
            is_waypoint: false,
        }
    }
}

/// Collects points in file order, numbering them as they arrive
struct PointCollector {
    points: Vec<RoutePoint>,
    skipped: usize,
}

impl PointCollector {
    fn push_all(&mut self, points: Vec<GpxPoint>, owner: Option<&str>, kind: &str, waypoint: bool) {
        let owner = owner.map(str::trim).filter(|o| !o.is_empty());
        for (n, point) in points.into_iter().enumerate() {
            if !point.has_valid_coordinates() {
                self.skipped += 1;
                continue;
            }
            let fallback = match owner {
                Some(owner) => format!("{owner} #{}", n + 1),
                None => format!("{kind} #{}", n + 1),
            };
            let mut route_point = point.into_route_point(fallback, self.points.len());
            route_point.is_waypoint = waypoint;
            self.points.push(route_point);
        }
    }
}

/// Read a GPX document into ordered route points.
///
/// Track points come first, then route points, then waypoints. The size
/// ceiling is checked before any parsing happens.
pub fn read_track(bytes: &[u8], max_bytes: usize) -> Result<Vec<RoutePoint>, TrackError> {
    if bytes.is_empty() {
        return Err(TrackError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(TrackError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let content = std::str::from_utf8(bytes)
        .map_err(|e| TrackError::Unreadable(format!("not valid UTF-8: {e}")))?;
    let content = content.trim_start_matches('\u{feff}');
    if content.trim().is_empty() {
        return Err(TrackError::Empty);
    }

    let document: GpxDocument =
        from_str(content).map_err(|e| TrackError::Unreadable(e.to_string()))?;

    let mut collector = PointCollector {
        points: Vec::new(),
        skipped: 0,
    };
    for track in document.tracks {
        let points: Vec<GpxPoint> = track
            .segments
            .into_iter()
            .flat_map(|segment| segment.points)
            .collect();
        collector.push_all(points, track.name.as_deref(), "Track point", false);
    }
    for route in document.routes {
        collector.push_all(route.points, route.name.as_deref(), "Route point", false);
    }
    collector.push_all(document.waypoints, None, "Waypoint", true);

    if collector.skipped > 0 {
        debug!("Skipped {} points with out-of-range coordinates", collector.skipped);
    }
    if collector.points.is_empty() {
        return Err(TrackError::NoRouteData);
    }

    info!("Read {} route points from track file", collector.points.len());
    Ok(collector.points)
}

/// The points that describe the route's path.
///
/// Track and route points win; a file holding only waypoints uses those.
#[must_use]
pub fn route_geometry(points: &[RoutePoint]) -> Vec<RoutePoint> {
    let path: Vec<RoutePoint> = points.iter().filter(|p| !p.is_waypoint).cloned().collect();
    if path.is_empty() {
        points.to_vec()
    } else {
        path
    }
}

/// Length of the path through `points` in kilometers
#[must_use]
pub fn route_distance_km(points: &[RoutePoint]) -> f64 {
    points
        .windows(2)
        .map(|leg| {
            distance(
                HaversineLocation {
                    latitude: leg[0].latitude,
                    longitude: leg[0].longitude,
                },
                HaversineLocation {
                    latitude: leg[1].latitude,
                    longitude: leg[1].longitude,
                },
                Units::Kilometers,
            )
        })
        .sum()
}
