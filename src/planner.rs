//! End-to-end layering plans
//!
//! Resolves the route to coordinates, fetches a forecast for each sampled
//! point concurrently, merges them and hands the result to the
//! recommendation engine.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::LayerupConfig;
use crate::models::{Activity, Effort, ForecastSeries, LayerItem, Location, RoutePoint};
use crate::recommend::{Conditions, RecommendationEngine};
use crate::route::{route_geometry, sample};
use crate::weather::{ForecastFetcher, Geocoder, OpenMeteoClient, aggregate};
use crate::{LayerupError, Result};

/// Where the activity takes place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteInput {
    /// Free-text place name, resolved with the geocoder
    Place(String),
    /// Points read from a track file
    Track(Vec<RoutePoint>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub route: RouteInput,
    /// Activity id, e.g. `road-bike`
    pub activity: String,
    pub effort: Effort,
    /// Local start time at the route
    pub start: NaiveDateTime,
}

/// Everything that went into a recommendation, and the recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeringPlan {
    pub route_label: String,
    pub activity: String,
    pub effort: Effort,
    pub start: NaiveDateTime,
    /// Points the forecast was fetched for
    pub points: Vec<RoutePoint>,
    pub forecast: ForecastSeries,
    pub conditions: Option<Conditions>,
    pub layers: Vec<LayerItem>,
}

/// Runs the full recommendation flow
#[derive(Clone)]
pub struct Planner {
    geocoder: Arc<dyn Geocoder>,
    fetcher: ForecastFetcher,
    engine: Arc<RecommendationEngine>,
    sample_target: usize,
}

impl Planner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        fetcher: ForecastFetcher,
        engine: Arc<RecommendationEngine>,
        sample_target: usize,
    ) -> Self {
        Self {
            geocoder,
            fetcher,
            engine,
            sample_target,
        }
    }

    /// Planner backed by OpenMeteo and the built-in layering tables
    pub fn from_config(config: &LayerupConfig) -> Result<Self> {
        let client = Arc::new(OpenMeteoClient::new(&config.weather)?);
        let mut fetcher = ForecastFetcher::new(client.clone());
        if config.cache.enabled {
            fetcher = fetcher.with_cache(config.cache.ttl());
        }
        let engine = Arc::new(RecommendationEngine::builtin()?);
        Ok(Self::new(client, fetcher, engine, config.route.sample_target))
    }

    #[must_use]
    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    #[must_use]
    pub fn sample_target(&self) -> usize {
        self.sample_target
    }

    #[instrument(skip(self, request), fields(activity = %request.activity, effort = %request.effort))]
    pub async fn plan(&self, request: PlanRequest) -> Result<LayeringPlan> {
        let start_time = Instant::now();

        let (route_label, points, forecast) = match request.route {
            RouteInput::Place(query) => {
                let location = self.resolve_place(&query).await?;
                let samples = self.fetcher.fetch(&location, request.start).await;
                let point = RoutePoint::new(
                    location.latitude,
                    location.longitude,
                    location.name.clone(),
                    0,
                );
                (location.name, vec![point], ForecastSeries::Single(samples))
            }
            RouteInput::Track(points) => {
                let sampled = self.sample_track(&points)?;
                let forecast = self.fetch_route(&sampled, request.start).await;
                (track_label(&sampled), sampled, forecast)
            }
        };

        let conditions = Conditions::from_series(&forecast, request.effort);
        let layers = match (Activity::from_id(&request.activity), &conditions) {
            (Some(activity), Some(conditions)) => {
                self.engine.recommend_for_conditions(activity, conditions)
            }
            (None, _) => {
                warn!("Unknown activity '{}', no layers recommended", request.activity);
                Vec::new()
            }
            (Some(_), None) => Vec::new(),
        };

        info!(
            "Planned {} layers for '{}' from {} points in {:.3}s",
            layers.len(),
            route_label,
            points.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(LayeringPlan {
            route_label,
            activity: request.activity,
            effort: request.effort,
            start: request.start,
            points,
            forecast,
            conditions,
            layers,
        })
    }

    /// First geocoding match for a place name
    async fn resolve_place(&self, query: &str) -> Result<Location> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LayerupError::validation("Location must not be empty"));
        }
        debug!("Geocoding location name: {}", query);

        let results = match self.geocoder.geocode(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", query, e);
                return Err(LayerupError::location_not_found(query));
            }
        };
        let location = results
            .into_iter()
            .next()
            .ok_or_else(|| LayerupError::location_not_found(query))?;

        debug!(
            "Resolved location: {} at {}",
            location.name,
            location.format_coordinates()
        );
        Ok(location)
    }

    /// Route points a forecast will be fetched for
    pub fn sample_track(&self, points: &[RoutePoint]) -> Result<Vec<RoutePoint>> {
        if points.is_empty() {
            return Err(LayerupError::validation("Route has no points"));
        }
        let geometry = route_geometry(points);
        let sampled = sample(&geometry, self.sample_target)?;
        debug!(
            "Sampled {} of {} route points",
            sampled.len(),
            geometry.len()
        );
        Ok(sampled)
    }

    async fn fetch_route(&self, points: &[RoutePoint], start: NaiveDateTime) -> ForecastSeries {
        let locations: Vec<Location> = points.iter().map(Location::from).collect();
        let per_point = join_all(
            locations
                .iter()
                .map(|location| self.fetcher.fetch(location, start)),
        )
        .await;

        match <[Vec<_>; 1]>::try_from(per_point) {
            Ok([samples]) => ForecastSeries::Single(samples),
            Err(per_point) => ForecastSeries::Aggregated(aggregate(&per_point)),
        }
    }
}

fn track_label(points: &[RoutePoint]) -> String {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => {
            format!("{} to {}", first.label, last.label)
        }
        (Some(only), _) => only.label.clone(),
        _ => String::new(),
    }
}
