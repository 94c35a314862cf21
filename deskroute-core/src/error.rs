//! Error types for Deskroute operations

use thiserror::Error;

/// Generation backend errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("No generation provider configured")]
    ProviderNotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: i64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Provider not supported: {provider}")]
    ProviderNotSupported { provider: String },
}

/// Master error type for all Deskroute errors.
#[derive(Debug, Clone, Error)]
pub enum DeskError {
    /// A handler was requested for a category that is not registered.
    /// This is a registry/handler mismatch, never a user-facing condition.
    #[error("Unknown category: {name}")]
    UnknownCategory { name: String },

    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(#[from] LlmError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl DeskError {
    pub fn unknown_category(name: impl Into<String>) -> Self {
        DeskError::UnknownCategory { name: name.into() }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::Serialization(err.to_string())
    }
}

/// Result type alias for Deskroute operations.
pub type DeskResult<T> = Result<T, DeskError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_display_rate_limited() {
        let err = LlmError::RateLimited {
            provider: "gemini".to_string(),
            retry_after_ms: 1500,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Rate limited"));
        assert!(msg.contains("gemini"));
        assert!(msg.contains("1500"));
    }

    #[test]
    fn test_config_error_display_missing_required() {
        let err = ConfigError::MissingRequired {
            field: "GEMINI_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required configuration field: GEMINI_API_KEY"
        );
    }

    #[test]
    fn test_desk_error_from_variants() {
        let llm = DeskError::from(LlmError::ProviderNotConfigured);
        assert!(matches!(llm, DeskError::GenerationUnavailable(_)));

        let config = DeskError::from(ConfigError::ProviderNotSupported {
            provider: "ollama".to_string(),
        });
        assert!(matches!(config, DeskError::Config(_)));

        let unknown = DeskError::unknown_category("request_document");
        assert_eq!(unknown.to_string(), "Unknown category: request_document");
    }
}
