// Response types for API endpoints

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::core::errors::ServiceError;
use crate::core::models::{Calendar, Event};

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Calendar created; carries the user's full calendar list
#[derive(Debug, Serialize)]
pub struct CalendarCreatedResponse {
    pub message: String,
    pub calendar: Vec<Calendar>,
}

/// Every calendar of the authenticated user
#[derive(Debug, Serialize)]
pub struct CalendarsResponse {
    pub calendars: Vec<Calendar>,
}

/// Event created; carries the event with its assigned id
#[derive(Debug, Serialize)]
pub struct EventCreatedResponse {
    pub message: String,
    pub event: Event,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    /// Create a new API error with details
    pub fn with_details(status: StatusCode, message: String, details: String) -> Self {
        Self {
            status,
            message,
            details: Some(details),
        }
    }

    /// Create from ServiceError
    ///
    /// Server-side faults are logged here with their full cause; the client
    /// only sees the generic message.
    pub fn from_service_error(err: ServiceError) -> Self {
        if err.is_server_fault() {
            error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.user_message(),
            details: err.details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::from_service_error(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Body cut off by the request body limit
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            );
        }

        ApiError::with_details(
            StatusCode::BAD_REQUEST,
            "Invalid request body".to_string(),
            rejection.body_text(),
        )
    }
}
