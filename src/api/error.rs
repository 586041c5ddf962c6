use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::LayerupError;

/// `LayerupError` rendered as a JSON error response
#[derive(Debug)]
pub struct ApiError(pub LayerupError);

impl From<LayerupError> for ApiError {
    fn from(err: LayerupError) -> Self {
        Self(err)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LayerupError::Validation { .. }
            | LayerupError::Track(_)
            | LayerupError::Route(_) => StatusCode::BAD_REQUEST,
            LayerupError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            LayerupError::Provider { .. } => StatusCode::BAD_GATEWAY,
            LayerupError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            LayerupError::Config { .. } | LayerupError::Cache { .. } | LayerupError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && status != StatusCode::GATEWAY_TIMEOUT {
            error!("Request failed: {}", self.0);
            self.0.user_message()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
