//! Error types and handling for the layerup application

use thiserror::Error;

use crate::route::{RouteError, TrackError};

/// Main error type for the layerup application
#[derive(Error, Debug)]
pub enum LayerupError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Geocoding produced no usable result
    #[error("Could not find location: {query}")]
    LocationNotFound { query: String },

    /// Weather or geocoding provider communication errors
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Uploaded track file could not be turned into route points
    #[error(transparent)]
    Track(#[from] TrackError),

    /// Route point processing errors
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// The request did not finish within the configured deadline
    #[error("Timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LayerupError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LayerupError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            LayerupError::Validation { message } => format!("Invalid input: {message}"),
            LayerupError::LocationNotFound { query } => {
                format!("Could not find location \"{query}\". Try a more specific place name.")
            }
            LayerupError::Provider { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            LayerupError::Track(err) => err.to_string(),
            LayerupError::Route(err) => err.to_string(),
            LayerupError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            LayerupError::Timeout { seconds } => {
                format!("The recommendation took longer than {seconds} seconds. Please try again.")
            }
            LayerupError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
