//! OpenMeteo client against a local mock server

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use layerup::config::WeatherConfig;
use layerup::recommend::RecommendationEngine;
use layerup::weather::{ForecastFetcher, ForecastProvider, Geocoder, OpenMeteoClient};
use layerup::{Effort, LayerupError, Location, PlanRequest, Planner, RouteInput};

fn client_for(server: &MockServer) -> OpenMeteoClient {
    let config = WeatherConfig {
        forecast_base_url: server.uri(),
        geocoding_base_url: server.uri(),
        timeout_seconds: 5,
        ..WeatherConfig::default()
    };
    OpenMeteoClient::new(&config).unwrap()
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 20)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
}

/// Twelve hourly slots from 06:00, 10°F and rising one degree per hour
fn forecast_body() -> Value {
    let times: Vec<String> = (6..18).map(|h| format!("2026-10-20T{h:02}:00")).collect();
    let temps: Vec<f64> = (0..12).map(|i| 10.0 + f64::from(i)).collect();
    json!({
        "latitude": 40.0,
        "longitude": -105.25,
        "timezone": "America/Denver",
        "hourly": {
            "time": times,
            "temperature_2m": temps,
            "precipitation_probability": [0, 5, 10, 20, 40, 35, 20, 10, 5, 0, 0, 0],
            "wind_speed_10m": [3.1, 4.0, 5.5, 7.2, 9.8, 12.0, 11.5, 9.0, 6.0, 4.2, 3.0, 2.5],
            "relative_humidity_2m": [80, 78, 75, 70, 66, 60, 58, 57, 60, 65, 70, 74],
            "weather_code": [0, 1, 2, 3, 61, 61, 3, 2, 1, 0, 0, 0]
        }
    })
}

fn geocoding_body() -> Value {
    json!({
        "results": [
            {
                "id": 5574991,
                "name": "Boulder",
                "latitude": 40.01499,
                "longitude": -105.27055,
                "country": "United States",
                "admin1": "Colorado"
            },
            {
                "id": 4588718,
                "name": "Boulder",
                "latitude": 46.15,
                "longitude": -112.07,
                "country": "United States",
                "admin1": "Montana"
            }
        ],
        "generationtime_ms": 0.5
    })
}

#[tokio::test]
async fn test_geocode_returns_candidates_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Boulder"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_body()))
        .mount(&server)
        .await;

    let locations = client_for(&server).geocode("Boulder").await.unwrap();
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].name, "Boulder, Colorado");
    assert_eq!(locations[0].country.as_deref(), Some("United States"));
}

#[tokio::test]
async fn test_geocode_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generationtime_ms": 0.3 })))
        .mount(&server)
        .await;

    let locations = client_for(&server).geocode("Nowhere at all").await.unwrap();
    assert!(locations.is_empty());
}

#[tokio::test]
async fn test_hourly_forecast_requests_imperial_units() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("wind_speed_unit", "mph"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let location = Location::new(40.0, -105.25, "Boulder".to_string());
    let forecast = client_for(&server).hourly_forecast(&location).await.unwrap();
    assert_eq!(forecast.times.len(), 12);
    assert_eq!(forecast.temperature_f[0], Some(10.0));
    assert_eq!(forecast.weather_code[4], Some(61));
}

#[tokio::test]
async fn test_fetcher_reads_provider_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let fetcher = ForecastFetcher::new(Arc::new(client_for(&server)));
    let location = Location::new(40.0, -105.25, "Boulder".to_string());
    let samples = fetcher.fetch(&location, start()).await;

    let temps: Vec<f64> = samples.iter().map(|s| s.temperature_f).collect();
    assert_eq!(temps, vec![11.0, 12.0, 13.0, 14.0, 15.0]);
    assert_eq!(samples[3].precipitation_probability_pct, 40);
    assert_eq!(samples[3].weather_code, 61);
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let location = Location::new(40.0, -105.25, "Boulder".to_string());
    let result = client_for(&server).hourly_forecast(&location).await;
    assert!(matches!(result, Err(LayerupError::Provider { .. })));
}

#[tokio::test]
async fn test_fetcher_falls_back_on_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let fetcher = ForecastFetcher::new(Arc::new(client_for(&server)));
    let location = Location::new(40.0, -105.25, "Boulder".to_string());
    let samples = fetcher.fetch(&location, start()).await;

    assert_eq!(samples.len(), 5);
    assert!(samples.iter().all(|s| (47.0..=83.0).contains(&s.temperature_f)));
}

#[tokio::test]
async fn test_plan_for_place_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "40.01499"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));
    let engine = Arc::new(RecommendationEngine::builtin().unwrap());
    let planner = Planner::new(client.clone(), ForecastFetcher::new(client), engine.clone(), 5);

    let plan = planner
        .plan(PlanRequest {
            route: RouteInput::Place("Boulder".to_string()),
            activity: "run".to_string(),
            effort: Effort::Easy,
            start: start(),
        })
        .await
        .unwrap();

    assert_eq!(plan.route_label, "Boulder, Colorado");
    let conditions = plan.conditions.unwrap();
    assert_eq!(conditions.base_temperature_f, 13.0);
    assert!(conditions.has_rain);

    let run = &engine.tables().run;
    let mut expected = run.bands[0].items.clone();
    expected.extend(run.rain.iter().cloned());
    assert_eq!(plan.layers, expected);
}
