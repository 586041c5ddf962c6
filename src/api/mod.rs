//! JSON API
//!
//! Mounted under `/api` by [`crate::web`]. Every failure is answered with
//! `{ "error": message }` and a status derived from the error kind.

mod error;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{Activity, Effort, ForecastSeries, LayerItem, RoutePoint};
use crate::planner::{LayeringPlan, PlanRequest, Planner, RouteInput};
use crate::recommend::{Conditions, LayeringTables};
use crate::route::{read_track, route_distance_km, route_geometry};
use crate::{LayerupError, Result};

pub use error::ApiError;

/// Room for multipart boundaries and headers around an uploaded file
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state of all handlers
pub struct AppState {
    pub planner: Planner,
    pub max_track_bytes: usize,
    pub request_timeout: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortInfo {
    pub id: String,
    pub heat_factor: f64,
}

/// A route point as sent by API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub activity: String,
    pub effort: Effort,
    /// Local start time at the route; defaults to now
    pub start: Option<NaiveDateTime>,
    /// Place name, mutually exclusive with `points`
    pub location: Option<String>,
    pub points: Option<Vec<ApiPoint>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LayersRequest {
    pub activity: String,
    pub effort: Effort,
    pub forecast: ForecastSeries,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LayersResponse {
    pub activity: String,
    pub conditions: Option<Conditions>,
    pub layers: Vec<LayerItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub points: Vec<RoutePoint>,
    /// Points a recommendation would fetch forecasts for
    pub sampled_points: Vec<RoutePoint>,
    pub distance_km: f64,
}

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.max_track_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/activities", get(list_activities))
        .route("/efforts", get(list_efforts))
        .route("/layering-tables", get(layering_tables))
        .route("/recommend", post(recommend))
        .route("/recommend/layers", post(recommend_layers))
        .route(
            "/tracks",
            post(upload_track).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

async fn list_activities() -> Json<Vec<ActivityInfo>> {
    Json(
        Activity::ALL
            .into_iter()
            .map(|activity| ActivityInfo {
                id: activity.id().to_string(),
                name: activity.display_name().to_string(),
            })
            .collect(),
    )
}

async fn list_efforts() -> Json<Vec<EffortInfo>> {
    Json(
        Effort::ALL
            .into_iter()
            .map(|effort| EffortInfo {
                id: effort.id().to_string(),
                heat_factor: effort.heat_factor(),
            })
            .collect(),
    )
}

async fn layering_tables(State(state): State<Arc<AppState>>) -> Json<LayeringTables> {
    Json(state.planner.engine().tables().clone())
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> std::result::Result<Json<LayeringPlan>, ApiError> {
    let route = route_input(request.location, request.points)?;
    let plan_request = PlanRequest {
        route,
        activity: request.activity,
        effort: request.effort,
        start: request
            .start
            .unwrap_or_else(|| Local::now().naive_local()),
    };

    let seconds = state.request_timeout.as_secs();
    let plan = tokio::time::timeout(state.request_timeout, state.planner.plan(plan_request))
        .await
        .map_err(|_| LayerupError::Timeout { seconds })??;

    Ok(Json(plan))
}

async fn recommend_layers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LayersRequest>,
) -> Json<LayersResponse> {
    let engine = state.planner.engine();
    let layers = engine.recommend(&request.activity, &request.forecast, request.effort);
    Json(LayersResponse {
        conditions: Conditions::from_series(&request.forecast, request.effort),
        activity: request.activity,
        layers,
    })
}

async fn upload_track(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> std::result::Result<Json<TrackSummary>, ApiError> {
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LayerupError::validation(format!("Failed to process multipart data: {e}")))?
    {
        if field.name() == Some("file") {
            if file_bytes.is_some() {
                return Err(LayerupError::validation("Upload one track file per request").into());
            }
            let data = field
                .bytes()
                .await
                .map_err(|e| LayerupError::validation(format!("Failed to read file data: {e}")))?;
            file_bytes = Some(data);
        } else {
            warn!("Unexpected field: {:?}", field.name());
        }
    }

    let file_bytes = file_bytes.unwrap_or_default();
    let points = read_track(&file_bytes, state.max_track_bytes).map_err(LayerupError::from)?;
    let sampled_points = state.planner.sample_track(&points)?;
    let distance_km = route_distance_km(&route_geometry(&points));
    info!(
        "Track upload: {} points, {:.1} km",
        points.len(),
        distance_km
    );

    Ok(Json(TrackSummary {
        points,
        sampled_points,
        distance_km,
    }))
}

fn route_input(location: Option<String>, points: Option<Vec<ApiPoint>>) -> Result<RouteInput> {
    match (location, points) {
        (Some(location), None) => Ok(RouteInput::Place(location)),
        (None, Some(points)) => points
            .into_iter()
            .enumerate()
            .map(|(i, point)| {
                if !(-90.0..=90.0).contains(&point.latitude)
                    || !(-180.0..=180.0).contains(&point.longitude)
                {
                    return Err(LayerupError::validation(format!(
                        "Point {} has out-of-range coordinates",
                        i + 1
                    )));
                }
                let label = point.label.unwrap_or_else(|| format!("Point #{}", i + 1));
                let mut route_point = RoutePoint::new(point.latitude, point.longitude, label, i);
                route_point.elevation = point.elevation;
                Ok(route_point)
            })
            .collect::<Result<Vec<_>>>()
            .map(RouteInput::Track),
        _ => Err(LayerupError::validation(
            "Provide either a location or route points",
        )),
    }
}
