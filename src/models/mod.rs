//! Data models for the layerup application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geocoded places and coordinates
//! - Route: Ordered points read from a track file
//! - Forecast: Hourly samples, per-hour aggregates and the series wrapping them
//! - Activity: Supported activities and effort levels
//! - Layer: Recommended clothing items

pub mod activity;
pub mod forecast;
pub mod layer;
pub mod location;
pub mod route;

// Re-export all public types for convenient access
pub use activity::{Activity, Effort};
pub use forecast::{AggregatedForecastSample, ForecastSample, ForecastSeries};
pub use layer::LayerItem;
pub use location::Location;
pub use route::RoutePoint;
