//! Logging and Tracing Initialization
//!
//! Sets up the tracing subscriber for structured logs. Output format and
//! verbosity are driven by environment variables so deployments can switch
//! to JSON logs without a rebuild.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,
    /// Emit JSON-formatted logs instead of human-readable output
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("ROLLBOOK_SERVICE_NAME")
                .unwrap_or_else(|_| "rollbook-api".to_string()),
            json_logs: std::env::var("ROLLBOOK_JSON_LOGS")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at application startup before any tracing occurs. Verbosity is
/// controlled by `RUST_LOG`; the default keeps request-level detail for this
/// crate and tower-http while staying at info elsewhere.
pub fn init_tracing(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rollbook_api=debug,tower_http=debug,info"));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(service = %config.service_name, "Telemetry initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_reads_env() {
        let config = TelemetryConfig::default();
        assert!(!config.service_name.is_empty());
    }
}
