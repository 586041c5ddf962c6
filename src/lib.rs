//! `layerup` - clothing layer recommendations for outdoor activities
//!
//! This library turns a route (a place name or a track file), a start time
//! and an effort level into a layering plan, based on short-range weather
//! forecasts along the route.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod recommend;
pub mod route;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::LayerupConfig;
pub use error::LayerupError;
pub use models::{
    Activity, AggregatedForecastSample, Effort, ForecastSample, ForecastSeries, LayerItem,
    Location, RoutePoint,
};
pub use planner::{LayeringPlan, PlanRequest, Planner, RouteInput};
pub use recommend::{Conditions, RecommendationEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, LayerupError>;
