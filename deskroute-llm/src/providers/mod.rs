//! Generation provider implementations
//!
//! Concrete `GenerationBackend` adapters for Gemini and OpenAI-compatible
//! chat completion APIs, each rate-limited on the client side.

pub mod gemini;
pub mod openai;
pub mod rate_limit;

pub use gemini::{GeminiBackend, GeminiClient};
pub use openai::{OpenAIBackend, OpenAIClient};
pub use rate_limit::RateLimiter;

use crate::GenerationBackend;
use deskroute_core::{BackendConfig, DeskError, DeskResult, LlmError, ProviderKind};
use std::sync::Arc;

pub(crate) fn request_failed(provider: &str, status: i32, message: impl Into<String>) -> DeskError {
    DeskError::GenerationUnavailable(LlmError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    })
}

pub(crate) fn rate_limited(provider: &str, retry_after_ms: i64) -> DeskError {
    DeskError::GenerationUnavailable(LlmError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    })
}

pub(crate) fn invalid_response(provider: &str, reason: impl Into<String>) -> DeskError {
    DeskError::GenerationUnavailable(LlmError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    })
}

pub(crate) fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<i64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0) as i64)
}

/// Build the configured backend.
pub fn build_backend(config: &BackendConfig) -> DeskResult<Arc<dyn GenerationBackend>> {
    if config.api_key.trim().is_empty() {
        return Err(DeskError::GenerationUnavailable(
            LlmError::ProviderNotConfigured,
        ));
    }

    let backend: Arc<dyn GenerationBackend> = match config.provider {
        ProviderKind::Gemini => Arc::new(GeminiBackend::from_config(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAIBackend::from_config(config)?),
    };

    tracing::info!(
        provider = backend.provider_id(),
        model = %config.model,
        "Generation backend ready"
    );
    Ok(backend)
}
