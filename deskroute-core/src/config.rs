//! Configuration types
//!
//! Constructed once at process start and shared read-only (by reference or
//! `Arc`). Nothing in the workspace reads the environment after this.

use crate::{ConfigError, DeskResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of backend calls allowed per exchange.
pub const DEFAULT_MAX_ROUND_TRIPS: u32 = 3;

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Supported generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Environment variable holding the API key for this provider.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash-exp",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "open_ai" | "open-ai" => Ok(ProviderKind::OpenAi),
            _ => Err(ConfigError::ProviderNotSupported {
                provider: s.to_string(),
            }),
        }
    }
}

/// Generation backend settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
}

impl BackendConfig {
    /// Backend settings with provider defaults and the given key.
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

/// Master configuration for request routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub backend: BackendConfig,
    /// Upper bound on backend calls within a single exchange.
    pub max_round_trips: u32,
}

impl RouterConfig {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
        }
    }

    /// Load configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DESKROUTE_PROVIDER`: `gemini` (default) or `openai`
    /// - `GEMINI_API_KEY` / `OPENAI_API_KEY`: required for the chosen provider
    /// - `DESKROUTE_MODEL`: model name (provider default otherwise)
    /// - `DESKROUTE_BASE_URL`: endpoint override
    /// - `DESKROUTE_TEMPERATURE`: sampling temperature (default: 0.7)
    /// - `DESKROUTE_TIMEOUT_SECS`: HTTP timeout (default: 60)
    /// - `DESKROUTE_REQUESTS_PER_MINUTE`: client-side rate limit (default: 60)
    /// - `DESKROUTE_MAX_ROUND_TRIPS`: backend calls per exchange (default: 3)
    pub fn from_env() -> DeskResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> DeskResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("DESKROUTE_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>()?,
            None => ProviderKind::default(),
        };

        let api_key = get(provider.api_key_var()).ok_or_else(|| ConfigError::MissingRequired {
            field: provider.api_key_var().to_string(),
        })?;

        let mut backend = BackendConfig::new(provider, api_key);
        if let Some(model) = get("DESKROUTE_MODEL") {
            backend.model = model;
        }
        backend.base_url = get("DESKROUTE_BASE_URL");
        if let Some(raw) = get("DESKROUTE_TEMPERATURE") {
            backend.temperature = parse_field("DESKROUTE_TEMPERATURE", &raw)?;
        }
        if let Some(raw) = get("DESKROUTE_TIMEOUT_SECS") {
            backend.timeout_secs = parse_field("DESKROUTE_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("DESKROUTE_REQUESTS_PER_MINUTE") {
            backend.requests_per_minute = parse_field("DESKROUTE_REQUESTS_PER_MINUTE", &raw)?;
        }

        let mut config = RouterConfig::new(backend);
        if let Some(raw) = get("DESKROUTE_MAX_ROUND_TRIPS") {
            config.max_round_trips = parse_field("DESKROUTE_MAX_ROUND_TRIPS", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - api_key is non-empty
    /// - model is non-empty
    /// - temperature in [0.0, 2.0]
    /// - timeout_secs, requests_per_minute and max_round_trips are positive
    pub fn validate(&self) -> DeskResult<()> {
        let backend = &self.backend;

        if backend.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: backend.provider.api_key_var().to_string(),
            }
            .into());
        }

        if backend.model.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "DESKROUTE_MODEL".to_string(),
            }
            .into());
        }

        if !(0.0..=2.0).contains(&backend.temperature) {
            return Err(invalid(
                "temperature",
                backend.temperature,
                "temperature must be between 0.0 and 2.0",
            ));
        }

        if backend.timeout_secs == 0 {
            return Err(invalid("timeout_secs", 0, "timeout_secs must be positive"));
        }

        if backend.requests_per_minute == 0 {
            return Err(invalid(
                "requests_per_minute",
                0,
                "requests_per_minute must be positive",
            ));
        }

        if self.max_round_trips == 0 {
            return Err(invalid(
                "max_round_trips",
                0,
                "max_round_trips must be at least 1",
            ));
        }

        Ok(())
    }
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        reason: "could not parse value".to_string(),
    })
}

fn invalid(field: &str, value: impl fmt::Display, reason: &str) -> crate::DeskError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// =============================================================================
// TESTS
// =============================================================================
