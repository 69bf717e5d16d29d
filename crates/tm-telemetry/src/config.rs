//! Telemetry configuration from environment variables.

use std::env;

/// Default service name reported in logs.
pub const DEFAULT_SERVICE_NAME: &str = "tiered-mint";

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name for logs
    pub service_name: String,

    /// Deployment instance identifier (one per sale)
    pub instance_id: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            instance_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: tiered-mint)
    /// - `TM_INSTANCE_ID`: Instance ID (default: 00)
    /// - `TM_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `TM_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `TM_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    #[must_use]
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),

            instance_id: env::var("TM_INSTANCE_ID").unwrap_or_else(|_| "00".to_string()),

            log_level: env::var("TM_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("TM_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("TM_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Create configuration for a named sale instance.
    #[must_use]
    pub fn for_instance(instance_id: &str) -> Self {
        let mut config = Self::from_env();
        config.instance_id = instance_id.to_string();
        config
    }

    /// Service name including the instance, unless it is the default one.
    #[must_use]
    pub fn full_service_name(&self) -> String {
        if self.instance_id == "00" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.instance_id)
        }
    }
}
