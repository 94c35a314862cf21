//! API Configuration Module
//!
//! Bind address, CORS origins and log format, loaded from environment
//! variables with development defaults.

use crate::error::{ApiError, ApiResult};
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: String,
    pub port: u16,
    /// Allowed CORS origins. `*` allows any origin without credentials.
    pub cors_origins: Vec<String>,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_FRONTEND_ORIGIN.to_string()],
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `DESKROUTE_API_BIND`: listen host (default: 0.0.0.0)
    /// - `PORT` or `DESKROUTE_API_PORT`: listen port (default: 8000)
    /// - `FRONTEND_ORIGINS`: comma-separated CORS origins (default: http://localhost:3000)
    /// - `DESKROUTE_LOG_JSON`: "true" for JSON log lines (default: false)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind = lookup("DESKROUTE_API_BIND")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.bind);

        let port = match lookup("PORT").or_else(|| lookup("DESKROUTE_API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", raw)))?,
            None => defaults.port,
        };

        let cors_origins = lookup("FRONTEND_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        let log_json = lookup("DESKROUTE_LOG_JSON")
            .map(|s| s.trim().eq_ignore_ascii_case("true") || s.trim() == "1")
            .unwrap_or(false);

        Ok(Self {
            bind,
            port,
            cors_origins,
            log_json,
        })
    }

    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ApiResult<ApiConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_port_precedence() {
        let config = load(&[("PORT", "9000"), ("DESKROUTE_API_PORT", "9100")]).unwrap();
        assert_eq!(config.port, 9000);

        let config = load(&[("DESKROUTE_API_PORT", "9100")]).unwrap();
        assert_eq!(config.port, 9100);

        assert!(load(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn test_origins_parsing() {
        let config = load(&[(
            "FRONTEND_ORIGINS",
            "https://desk.example.com, http://localhost:5173,,",
        )])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://desk.example.com", "http://localhost:5173"]
        );
        assert!(!config.allows_any_origin());

        let config = load(&[("FRONTEND_ORIGINS", "*")]).unwrap();
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_log_json_flag() {
        assert!(load(&[("DESKROUTE_LOG_JSON", "TRUE")]).unwrap().log_json);
        assert!(!load(&[("DESKROUTE_LOG_JSON", "no")]).unwrap().log_json);
    }

    #[test]
    fn test_invalid_bind() {
        let config = load(&[("DESKROUTE_API_BIND", "not a host")]).unwrap();
        assert!(config.bind_addr().is_err());
    }
}
