//! API Configuration Module
//!
//! This module provides configuration for CORS, the bind address, and other
//! production-level API settings. Configuration is loaded from environment
//! variables with sensible defaults for development.

use rollbook_core::ConfigError;
use std::net::SocketAddr;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and server binding.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    /// Example: "https://rollbook.example.org,https://app.rollbook.example.org"
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Server Binding
    // ========================================================================
    /// Host interface to bind the HTTP listener to.
    pub bind_host: String,

    /// TCP port for the HTTP listener.
    pub bind_port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // CORS defaults: permissive for development
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours

            bind_host: "0.0.0.0".to_string(),
            bind_port: 8000,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `ROLLBOOK_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `ROLLBOOK_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `ROLLBOOK_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `ROLLBOOK_BIND_HOST`: Listener interface (default: 0.0.0.0)
    /// - `ROLLBOOK_BIND_PORT`: Listener port (default: 8000)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("ROLLBOOK_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("ROLLBOOK_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = std::env::var("ROLLBOOK_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let bind_host =
            std::env::var("ROLLBOOK_BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let bind_port = std::env::var("ROLLBOOK_BIND_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            bind_host,
            bind_port,
        }
    }

    /// Resolve the configured host and port into a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_host, self.bind_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "bind_host".to_string(),
                value: self.bind_host.clone(),
                reason: "not a valid IP address".to_string(),
            })
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| allowed == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert!(!config.cors_allow_credentials);
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.bind_port, 8000);
    }

    #[test]
    fn test_bind_addr_resolution() {
        let config = ApiConfig::default();
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 8000);

        let bad = ApiConfig {
            bind_host: "not-an-ip".to_string(),
            ..ApiConfig::default()
        };
        assert!(bad.bind_addr().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = ApiConfig::default();
        assert!(!config.is_production());

        config.cors_origins = vec!["https://rollbook.example.org".to_string()];
        assert!(config.is_production());
    }

    #[test]
    fn test_origin_allowed_dev_mode() {
        let config = ApiConfig::default();
        assert!(config.is_origin_allowed("https://anything.com"));
        assert!(config.is_origin_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_origin_allowed_production() {
        let mut config = ApiConfig::default();
        config.cors_origins = vec![
            "https://rollbook.example.org".to_string(),
            "https://app.rollbook.example.org".to_string(),
        ];

        assert!(config.is_origin_allowed("https://rollbook.example.org"));
        assert!(config.is_origin_allowed("https://app.rollbook.example.org"));
        assert!(!config.is_origin_allowed("https://evil.com"));
    }
}
