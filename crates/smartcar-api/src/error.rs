//! API error types and conversions

use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use smartcar_core::VehicleError;

/// How translator failures map onto HTTP status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCodePolicy {
    /// Every failure is 500, matching the reference service
    #[default]
    Uniform,
    /// 400 for validation and domain failures, 502/503/504 for upstream failures
    Classified,
}

impl FromStr for StatusCodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(StatusCodePolicy::Uniform),
            "classified" => Ok(StatusCodePolicy::Classified),
            _ => Err(format!(
                "Invalid status code policy: {}. Use 'uniform' or 'classified'",
                s
            )),
        }
    }
}

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found
    NotFound(String),
    /// 502 Bad Gateway (upstream reported a failure)
    BadGateway(String),
    /// 503 Service Unavailable (upstream unreachable)
    ServiceUnavailable(String),
    /// 504 Gateway Timeout
    GatewayTimeout(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Error body: `{ "error": "<message>" }`
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Convert a translator failure according to `policy`
    pub fn from_vehicle_error(err: VehicleError, policy: StatusCodePolicy) -> Self {
        let message = err.to_string();
        match policy {
            StatusCodePolicy::Uniform => ApiError::Internal(message),
            StatusCodePolicy::Classified => match err.status_code() {
                400 => ApiError::BadRequest(message),
                502 => ApiError::BadGateway(message),
                503 => ApiError::ServiceUnavailable(message),
                504 => ApiError::GatewayTimeout(message),
                _ => ApiError::Internal(message),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::GatewayTimeout(msg)
            | ApiError::Internal(msg) => msg,
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "API error");
        } else if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), %message, "API client error");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
