//! Configuration management for the layerup application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::LayerupError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the layerup application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerupConfig {
    /// Weather and geocoding provider settings
    pub weather: WeatherConfig,
    /// Route handling settings
    pub route: RouteConfig,
    /// Forecast cache settings
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP API settings
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the forecast API
    pub forecast_base_url: String,
    /// Base URL of the geocoding API
    pub geocoding_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Number of forecast days requested from the provider
    pub forecast_days: u8,
}

/// Route handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Maximum number of route points that get a forecast lookup
    pub sample_target: usize,
    /// Largest accepted track file in kilobytes
    pub max_track_file_kb: usize,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Cache directory location
    pub location: String,
    /// Forecast TTL in minutes
    pub ttl_minutes: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound for a whole recommendation request
    pub request_timeout_seconds: u32,
}

// Default value functions
fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_forecast_days() -> u8 {
    7
}

fn default_sample_target() -> usize {
    5
}

fn default_max_track_file_kb() -> usize {
    5 * 1024
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("layerup").to_string_lossy().to_string())
        .unwrap_or_else(|| ".layerup-cache".to_string())
}

fn default_cache_ttl() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_weather_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            sample_target: default_sample_target(),
            max_track_file_kb: default_max_track_file_kb(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            location: default_cache_location(),
            ttl_minutes: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl RouteConfig {
    #[must_use]
    pub fn max_track_file_bytes(&self) -> usize {
        self.max_track_file_kb * 1024
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_minutes) * 60)
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds))
    }
}

impl LayerupConfig {
    /// Load configuration from the given path, or the default config file,
    /// then apply `LAYERUP_` environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // LAYERUP_WEATHER__TIMEOUT_SECONDS=5 overrides weather.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("LAYERUP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: LayerupConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("layerup").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.forecast_base_url.is_empty() {
            self.weather.forecast_base_url = default_forecast_base_url();
        }
        if self.weather.geocoding_base_url.is_empty() {
            self.weather.geocoding_base_url = default_geocoding_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.forecast_days == 0 {
            self.weather.forecast_days = default_forecast_days();
        }
        if self.route.max_track_file_kb == 0 {
            self.route.max_track_file_kb = default_max_track_file_kb();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 120 {
            return Err(LayerupError::config("Weather API timeout cannot exceed 120 seconds").into());
        }

        if !(1..=16).contains(&self.weather.forecast_days) {
            return Err(LayerupError::config("Forecast days must be between 1 and 16").into());
        }

        if self.route.sample_target < 2 {
            return Err(LayerupError::config("Route sample target must be at least 2 points").into());
        }

        if self.route.sample_target > 24 {
            return Err(LayerupError::config("Route sample target cannot exceed 24 points").into());
        }

        if self.route.max_track_file_kb > 50 * 1024 {
            return Err(LayerupError::config("Track file limit cannot exceed 51200 KB (50 MB)").into());
        }

        if self.cache.ttl_minutes > 24 * 60 {
            return Err(LayerupError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(LayerupError::config("Request timeout cannot exceed 300 seconds").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(LayerupError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(LayerupError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.weather.forecast_base_url, &self.weather.geocoding_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(LayerupError::config(format!(
                    "Provider base URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
