//! Error Types for the Deskroute API
//!
//! Every failure leaves the transport as a JSON `ApiError` with a status code
//! derived from its `ErrorCode`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deskroute_core::DeskError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing or blank
    MissingField,

    /// Service configuration is incomplete or invalid
    ConfigurationError,

    /// Generation backend is unreachable
    ServiceUnavailable,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::MissingField => StatusCode::BAD_REQUEST,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ConfigurationError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::ConfigurationError => "Service is misconfigured",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing or blank", field),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::UnknownCategory { name } => {
                tracing::error!(category = %name, "Backend requested an unregistered handler");
                ApiError::internal_error("Request routing failed")
                    .with_details(serde_json::json!({ "category": name }))
            }
            DeskError::GenerationUnavailable(e) => {
                tracing::warn!(error = %e, "Generation backend unavailable");
                ApiError::from_code(ErrorCode::ServiceUnavailable)
            }
            DeskError::Config(e) => ApiError::new(ErrorCode::ConfigurationError, e.to_string()),
            DeskError::Serialization(e) => {
                tracing::error!(error = %e, "Serialization failed");
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use deskroute_core::{ConfigError, LlmError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_category_is_internal() {
        let err = ApiError::from(DeskError::unknown_category("teleport"));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.details, Some(serde_json::json!({"category": "teleport"})));
    }

    #[test]
    fn test_desk_error_conversions() {
        let unavailable = ApiError::from(DeskError::from(LlmError::ProviderNotConfigured));
        assert_eq!(unavailable.code, ErrorCode::ServiceUnavailable);

        let config = ApiError::from(DeskError::from(ConfigError::MissingRequired {
            field: "GEMINI_API_KEY".to_string(),
        }));
        assert_eq!(config.code, ErrorCode::ConfigurationError);
        assert!(config.message.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(ApiError::missing_field("message")).unwrap();
        assert_eq!(json["code"], "MISSING_FIELD");
        assert!(json.get("details").is_none());
    }
}
