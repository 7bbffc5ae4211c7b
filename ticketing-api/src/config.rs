//! API Configuration Module
//!
//! Server, CORS, request limits, logging and store selection. Configuration
//! is loaded from environment variables with sensible defaults for
//! development.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

// ============================================================================
// ENUMS
// ============================================================================

/// Which `TicketStore` implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgreSQL through a deadpool connection pool
    Postgres,
    /// Process-local in-memory store (nothing survives a restart)
    Memory,
}

impl StoreKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(StoreKind::Postgres),
            "memory" | "in-memory" | "mem" => Some(StoreKind::Memory),
            _ => None,
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for the HTTP server and its middleware stack.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host/interface to bind.
    pub bind_host: String,

    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,

    pub log_format: LogFormat,

    pub store: StoreKind,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(), // Empty = allow all
            cors_max_age_secs: 86400, // 24 hours
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 64 * 1024,
            log_format: LogFormat::Pretty,
            store: StoreKind::Postgres,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TICKETING_API_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` or `TICKETING_API_PORT`: Port (default: 3000)
    /// - `TICKETING_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `TICKETING_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `TICKETING_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
    /// - `TICKETING_MAX_BODY_BYTES`: Request body limit (default: 65536)
    /// - `TICKETING_LOG_FORMAT`: "pretty" or "json" (default: pretty)
    /// - `TICKETING_STORE`: "postgres" or "memory" (default: postgres)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("TICKETING_API_BIND").unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("TICKETING_API_PORT")) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", value)))?,
            None => defaults.port,
        };

        let cors_origins = lookup("TICKETING_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = lookup("TICKETING_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let request_timeout = lookup("TICKETING_REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_body_bytes = lookup("TICKETING_MAX_BODY_BYTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_body_bytes);

        let log_format = match lookup("TICKETING_LOG_FORMAT") {
            Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let store = match lookup("TICKETING_STORE") {
            Some(value) => StoreKind::parse(&value).ok_or_else(|| {
                ApiError::invalid_input(format!("Unknown ticket store: {}", value))
            })?,
            None => defaults.store,
        };

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs,
            request_timeout,
            max_body_bytes,
            log_format,
            store,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() -> ApiResult<()> {
        let config = ApiConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.store, StoreKind::Postgres);
        Ok(())
    }

    #[test]
    fn test_port_precedence() -> ApiResult<()> {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("TICKETING_API_PORT", "9090"),
        ]))?;
        assert_eq!(config.port, 8080);

        let config = ApiConfig::from_lookup(lookup_from(&[("TICKETING_API_PORT", "9090")]))?;
        assert_eq!(config.port, 9090);
        Ok(())
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = ApiConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cors_origins_parsed() -> ApiResult<()> {
        let config = ApiConfig::from_lookup(lookup_from(&[(
            "TICKETING_CORS_ORIGINS",
            "https://a.example, ,https://b.example",
        )]))?;
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_store_and_log_format() -> ApiResult<()> {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("TICKETING_STORE", "memory"),
            ("TICKETING_LOG_FORMAT", "JSON"),
        ]))?;
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.log_format, LogFormat::Json);

        assert!(ApiConfig::from_lookup(lookup_from(&[("TICKETING_STORE", "redis")])).is_err());
        Ok(())
    }

    #[test]
    fn test_bind_addr() -> ApiResult<()> {
        let config = ApiConfig::default();
        assert_eq!(config.bind_addr()?.port(), 3000);

        let mut config = ApiConfig::default();
        config.bind_host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
        Ok(())
    }
}
