use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use layerup::api::AppState;
use layerup::route::read_track;
use layerup::{
    Activity, Effort, ForecastSeries, LayeringPlan, LayerupConfig, LayerupError, PlanRequest,
    Planner, RouteInput, cache, logging, web,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug output from layerup itself
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend layers for a place or a GPX track
    Recommend {
        /// Activity id, see `layerup activities`
        #[arg(long)]
        activity: String,

        /// easy, endurance, tempo or all-out
        #[arg(long)]
        effort: Effort,

        /// Place name to look up
        #[arg(long, conflicts_with = "track", required_unless_present = "track")]
        location: Option<String>,

        /// GPX file with the route
        #[arg(long)]
        track: Option<PathBuf>,

        /// Local start time, e.g. 2026-10-20T07:30 (defaults to now)
        #[arg(long, value_parser = parse_start)]
        start: Option<NaiveDateTime>,

        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported activities
    Activities,
    /// Run the HTTP API
    Serve {
        /// Overrides server.port
        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_start(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("expected YYYY-MM-DDTHH:MM, got '{value}'"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let message = match e.downcast_ref::<LayerupError>() {
            Some(err) => err.user_message(),
            None => format!("{e:#}"),
        };
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = LayerupConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose);

    match cli.command {
        Command::Activities => {
            for activity in Activity::ALL {
                println!("{:<14} {}", activity.id(), activity.display_name());
            }
            Ok(())
        }
        Command::Recommend {
            activity,
            effort,
            location,
            track,
            start,
            json,
        } => {
            init_cache(&config);
            let planner = Planner::from_config(&config)?;

            let route = match (location, track) {
                (_, Some(path)) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let points = read_track(&bytes, config.route.max_track_file_bytes())
                        .map_err(LayerupError::from)?;
                    RouteInput::Track(points)
                }
                (Some(location), None) => RouteInput::Place(location),
                (None, None) => return Err(LayerupError::validation("Provide --location or --track").into()),
            };
            let request = PlanRequest {
                route,
                activity,
                effort,
                start: start.unwrap_or_else(|| Local::now().naive_local()),
            };

            let timeout = config.server.request_timeout();
            let plan = tokio::time::timeout(timeout, planner.plan(request))
                .await
                .map_err(|_| LayerupError::Timeout {
                    seconds: timeout.as_secs(),
                })??;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
            Ok(())
        }
        Command::Serve { port } => {
            init_cache(&config);
            let state = Arc::new(AppState {
                planner: Planner::from_config(&config)?,
                max_track_bytes: config.route.max_track_file_bytes(),
                request_timeout: config.server.request_timeout(),
            });
            web::run(state, port.unwrap_or(config.server.port)).await
        }
    }
}

/// Open the forecast cache; recommendations still work without it
fn init_cache(config: &LayerupConfig) {
    if !config.cache.enabled {
        return;
    }
    let result = std::fs::create_dir_all(&config.cache.location)
        .context("Failed to create cache directory")
        .and_then(|()| cache::init(&config.cache.location));
    match result {
        Ok(()) => info!("Forecast cache at {}", config.cache.location),
        Err(e) => warn!("Forecast cache disabled: {:#}", e),
    }
}

fn print_plan(plan: &LayeringPlan) {
    println!(
        "{} · {} · {} effort · start {}",
        plan.route_label,
        plan.activity,
        plan.effort,
        plan.start.format("%Y-%m-%d %H:%M")
    );

    match &plan.forecast {
        ForecastSeries::Single(samples) => {
            for s in samples {
                println!(
                    "  {}  {:>5.1}°F  wind {:>4.1} mph  rain {:>3}%  {}",
                    s.timestamp.format("%H:%M"),
                    s.temperature_f,
                    s.wind_speed_mph,
                    s.precipitation_probability_pct,
                    s.description()
                );
            }
        }
        ForecastSeries::Aggregated(samples) => {
            println!("  across {} route points:", plan.points.len());
            for s in samples {
                println!(
                    "  {}  {:>5.1}-{:.1}°F  wind {:>4.1} mph  rain {:>3}%  {}",
                    s.timestamp.format("%H:%M"),
                    s.temperature_min_f,
                    s.temperature_max_f,
                    s.wind_speed_mph,
                    s.precipitation_probability_pct,
                    s.description()
                );
            }
        }
    }

    if let Some(conditions) = &plan.conditions {
        println!(
            "Feels like {:.1}°F (forecast {:.1}°F), wind up to {:.1} mph{}",
            conditions.felt_temperature_f,
            conditions.base_temperature_f,
            conditions.max_wind_mph,
            if conditions.has_rain { ", rain likely" } else { "" }
        );
    }

    if plan.layers.is_empty() {
        println!("No layers to recommend.");
        return;
    }
    println!();
    for layer in &plan.layers {
        println!("  [{:<7}] {:<32} {}", layer.category, layer.item, layer.rationale);
    }
}
