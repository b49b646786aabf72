//! API error handling.
//!
//! This module provides error types and response formatting for the API.
//! Every error body has the shape `{"error": "<message>"}`; validation
//! failures may add field-level `details`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::RepositoryError;

// =============================================================================
// API Error
// =============================================================================

/// API error structure for JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
    /// Optional field-level errors for validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Creates a new API error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            details: None,
        }
    }

    /// Creates a validation error with field-level details.
    #[must_use]
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            error: message.into(),
            details: Some(details),
        }
    }
}

/// Field-level error for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field that failed validation.
    pub field: String,
    /// Error message for this field.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and error details.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error details.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(message))
    }

    /// Creates a 400 Bad Request response for validation errors.
    ///
    /// The first field message becomes the top-level `error`.
    #[must_use]
    pub fn validation_error(details: Vec<FieldError>) -> Self {
        let message = details
            .first()
            .map_or_else(|| "Validation failed".to_string(), |d| d.message.clone());
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation(message, details),
        )
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new(message))
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(message))
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<RepositoryError> for ApiErrorResponse {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Validation { field, message } => {
                Self::validation_error(vec![FieldError::new(field, message)])
            }
            RepositoryError::NotFound { .. } => Self::not_found(error.to_string()),
            // Storage details stay in the log.
            RepositoryError::Storage(source) => {
                tracing::error!(error = %source, "Storage failure while handling request");
                Self::internal_error("An internal error occurred")
            }
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(%rejection, "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Validation error type for request bodies.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Field-level errors.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Creates a validation error with a single field error.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, message)])
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::validation_error(error.errors)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::infrastructure::StoreError;
    use rstest::rstest;

    #[rstest]
    fn test_api_error_serializes_without_details() {
        let json = serde_json::to_value(ApiError::new("Task not found")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Task not found" }));
    }

    #[rstest]
    fn test_validation_error_uses_first_message() {
        let response = ApiErrorResponse::validation_error(vec![
            FieldError::new("title", "Title is required"),
            FieldError::new("description", "ignored"),
        ]);

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.error, "Title is required");
        assert_eq!(response.error.details.as_ref().map(Vec::len), Some(2));
    }

    #[rstest]
    fn test_repository_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity: "Task",
            id: TaskId::from("t").to_string(),
        };

        let response = ApiErrorResponse::from(error);

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.error, "Task not found");
    }

    #[rstest]
    fn test_repository_validation_maps_to_400() {
        let response =
            ApiErrorResponse::from(RepositoryError::validation("title", "Title cannot be empty"));

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.error, "Title cannot be empty");
    }

    #[rstest]
    fn test_storage_error_hides_details() {
        let error = RepositoryError::Storage(StoreError::Io {
            path: "/data.json".into(),
            source: std::io::Error::other("disk full"),
        });

        let response = ApiErrorResponse::from(error);

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.error.error.contains("disk full"));
    }

    #[rstest]
    fn test_validation_error_single() {
        let response: ApiErrorResponse =
            ValidationError::single("content", "Content is required").into();

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.error, "Content is required");
    }
}
