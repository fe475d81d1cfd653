use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use diabetes_guide_domain::services::AssessmentServiceError;

/// Error response format for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a consent required error response
    pub fn consent_required() -> Self {
        Self {
            error: "consent_required".to_string(),
            message: "Consent to data storage is required to save a patient profile".to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    /// HTTP status for this error code
    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "consent_required" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AssessmentServiceError> for ErrorResponse {
    fn from(err: AssessmentServiceError) -> Self {
        match err {
            AssessmentServiceError::ValidationError(msg) => ErrorResponse::validation_error(&msg, None),
            AssessmentServiceError::ConsentRequired => ErrorResponse::consent_required(),
            AssessmentServiceError::NotFound(_) => ErrorResponse::not_found("patient"),
            other => {
                // internal details stay in the log
                error!("Request failed: {}", other);
                ErrorResponse::internal_error()
            }
        }
    }
}

/// Malformed or mistyped request bodies are reported like validation failures
impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        ErrorResponse::validation_error(
            "Request body is not a valid profile",
            Some(serde_json::Value::String(rejection.body_text())),
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (AssessmentServiceError::ValidationError("bad age".to_string()), StatusCode::BAD_REQUEST),
            (AssessmentServiceError::ConsentRequired, StatusCode::FORBIDDEN),
            (AssessmentServiceError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AssessmentServiceError::RepositoryError("disk".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AssessmentServiceError::ReportError("font".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = ErrorResponse::from(AssessmentServiceError::RepositoryError("secret path".to_string()));
        assert!(!response.message.contains("secret"));
    }
}
