//! Response types for the attendance API.
//!
//! This module defines the success bodies that are specific to the HTTP
//! layer and the error response structures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::attendance::{CheckInOutcome, CheckOutOutcome};
use crate::error::EngineError;

/// Body returned by `POST /attendance/check-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    /// The worker that checked in.
    pub worker_id: String,
    /// Recorded check-in time.
    pub time: NaiveDateTime,
    /// Whether the check-in was late.
    pub is_late: bool,
    /// Human-readable confirmation.
    pub message: String,
}

impl From<CheckInOutcome> for CheckInResponse {
    fn from(outcome: CheckInOutcome) -> Self {
        let message = if outcome.is_late {
            "Checked in (late)".to_string()
        } else {
            "Checked in".to_string()
        };
        Self {
            worker_id: outcome.worker_id,
            time: outcome.time,
            is_late: outcome.is_late,
            message,
        }
    }
}

/// Body returned by `POST /attendance/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutResponse {
    /// The worker that checked out.
    pub worker_id: String,
    /// Recorded check-out time.
    pub time: NaiveDateTime,
    /// Human-readable confirmation.
    pub message: String,
}

impl From<CheckOutOutcome> for CheckOutResponse {
    fn from(outcome: CheckOutOutcome) -> Self {
        Self {
            worker_id: outcome.worker_id,
            time: outcome.time,
            message: "Checked out".to_string(),
        }
    }
}

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
    /// Whether resubmitting the same request may succeed.
    #[serde(default)]
    pub retryable: bool,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
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
    /// Pairs an error body with a status code.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
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
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::Validation { field, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the '{}' field and try again", field),
                ),
            ),
            EngineError::AlreadyCheckedIn { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("ALREADY_CHECKED_IN", message),
            ),
            EngineError::NotCheckedIn { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("NOT_CHECKED_IN", message),
            ),
            EngineError::WorkerExists { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("WORKER_EXISTS", message),
            ),
            EngineError::WorkerNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("WORKER_NOT_FOUND", message),
            ),
            EngineError::Forbidden { .. } => ApiErrorResponse::new(
                StatusCode::FORBIDDEN,
                ApiError::new("FORBIDDEN", message),
            ),
            EngineError::StorageUnavailable { .. } => ApiErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError {
                    retryable: true,
                    ..ApiError::with_details(
                        "TRANSIENT_STORAGE",
                        message,
                        "Nothing was recorded; the request can be retried",
                    )
                },
            ),
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
        assert!(json.contains("\"retryable\":false"));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_conflicts_map_to_409() {
        let response: ApiErrorResponse = EngineError::AlreadyCheckedIn {
            worker_id: "worker_001".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "ALREADY_CHECKED_IN");
        assert!(!response.error.retryable);

        let response: ApiErrorResponse = EngineError::NotCheckedIn {
            worker_id: "worker_001".to_string(),
        }
        .into();
        assert_eq!(response.error.code, "NOT_CHECKED_IN");
    }

    #[test]
    fn test_storage_unavailable_is_retryable_503() {
        let response: ApiErrorResponse = EngineError::StorageUnavailable {
            message: "lock timeout".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.error.code, "TRANSIENT_STORAGE");
        assert!(response.error.retryable);
    }

    #[test]
    fn test_not_found_and_forbidden() {
        let response: ApiErrorResponse = EngineError::WorkerNotFound {
            worker_id: "nobody".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.message, "Worker not found: nobody");

        let response: ApiErrorResponse = EngineError::Forbidden {
            message: "manager role required".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_check_in_response_message() {
        let outcome = CheckInOutcome {
            worker_id: "worker_001".to_string(),
            time: NaiveDateTime::parse_from_str("2026-03-02 09:10:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            is_late: true,
        };
        let response = CheckInResponse::from(outcome);
        assert_eq!(response.message, "Checked in (late)");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["workerId"], "worker_001");
        assert_eq!(json["isLate"], true);
    }
}
