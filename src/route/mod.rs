//! Route handling
//!
//! Turns an uploaded track file into ordered route points and reduces them to
//! the handful of points that get a forecast lookup.

pub mod gpx;
pub mod sampler;

use thiserror::Error;

pub use gpx::{read_track, route_distance_km, route_geometry};
pub use sampler::sample;

/// Errors raised while reading a track file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("The track file is empty")]
    Empty,

    #[error("The track file is too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("Unreadable track file: {0}")]
    Unreadable(String),

    #[error("No route data found in the track file")]
    NoRouteData,
}

/// Errors raised while processing route points
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("Cannot sample a route down to {target} points, at least 2 are needed")]
    InvalidSampleTarget { target: usize },
}
