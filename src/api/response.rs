//! Response types for the HR engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", message),
            },
            EngineError::InvalidState { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_STATE", message))
            }
            EngineError::DuplicateConflict { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("DUPLICATE", message))
            }
            EngineError::InvalidRecord { field, .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("The field '{}' contains invalid information", field),
                ),
            ),
            EngineError::ParseFailure { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("PARSE_ERROR", message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_not_found_maps_to_404_with_verbatim_message() {
        let api_error: ApiErrorResponse = EngineError::not_found("Employee", 3).into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "NOT_FOUND");
        assert_eq!(api_error.error.message, "Employee not found");
    }

    #[test]
    fn test_invalid_state_maps_to_400() {
        let api_error: ApiErrorResponse =
            EngineError::invalid_state("Payroll must be processed before marking as paid").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            api_error.error.message,
            "Payroll must be processed before marking as paid"
        );
    }

    #[test]
    fn test_duplicate_maps_to_400() {
        let api_error: ApiErrorResponse =
            EngineError::duplicate("Department", "name", "Engineering").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "DUPLICATE");
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "server.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
