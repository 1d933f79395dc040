//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the small bodies some endpoints return.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::session::CurrentUser;

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

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::with_details(
            "INVALID_QUERY",
            message,
            "Expected numeric 'month' (1-12) and 'year' query parameters",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::InvalidEmployee { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_EMPLOYEE",
                    message,
                    "The employee data contains invalid information",
                ),
            ),
            EngineError::InvalidNovelty { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_NOVELTY",
                    message,
                    "The novelty data contains invalid information",
                ),
            ),
            EngineError::InvalidPeriod { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_PERIOD", message))
            }
            EngineError::NoActiveEmployees { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("NO_ACTIVE_EMPLOYEES", message))
            }
            EngineError::EmployeeNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("EMPLOYEE_NOT_FOUND", message),
            },
            EngineError::PayrollNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "PAYROLL_NOT_FOUND",
                    message,
                    "Run the payroll for the period first",
                ),
            },
            EngineError::Calculation { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
            EngineError::Storage { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            },
            EngineError::Export { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            },
        }
    }
}

/// Body returned when a period is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// How many payrolls were removed.
    pub deleted: usize,
}

/// Body returned by the session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Whether an operator is signed in.
    pub signed_in: bool,
    /// The signed-in operator.
    pub user: Option<CurrentUser>,
}

impl From<Option<CurrentUser>> for SessionResponse {
    fn from(user: Option<CurrentUser>) -> Self {
        Self {
            signed_in: user.is_some(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_carries_hint() {
        let error = ApiError::invalid_query("missing field `year`");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["code"], "INVALID_QUERY");
        assert_eq!(json["message"], "missing field `year`");
        assert!(json["details"].as_str().unwrap().contains("month"));
    }

    #[test]
    fn test_plain_error_omits_details() {
        let json = serde_json::to_value(ApiError::malformed_json("unexpected end of input")).unwrap();
        assert_eq!(json["code"], "MALFORMED_JSON");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_payroll_not_found_is_404() {
        let api_error: ApiErrorResponse = EngineError::PayrollNotFound {
            payroll_id: "emp_001-3-2025".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "PAYROLL_NOT_FOUND");
        assert!(api_error.error.message.contains("emp_001-3-2025"));
    }

    #[test]
    fn test_invalid_period_is_400() {
        let api_error: ApiErrorResponse = EngineError::InvalidPeriod {
            month: 0,
            year: 2025,
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PERIOD");
    }

    #[test]
    fn test_storage_error_is_500() {
        let api_error: ApiErrorResponse = EngineError::Storage {
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.details.as_deref(), Some("Storage error: disk full"));
    }

    #[test]
    fn test_calculation_error_is_500() {
        let api_error: ApiErrorResponse = EngineError::Calculation {
            message: "task panicked".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CALCULATION_ERROR");
    }

    #[test]
    fn test_session_response_from_user() {
        let response = SessionResponse::from(None);
        assert!(!response.signed_in);
        assert!(response.user.is_none());
    }
}
