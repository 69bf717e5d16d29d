//! # Tiered Mint Telemetry
//!
//! Structured logging and Prometheus metrics for the issuance engine.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry with `EnvFilter` and a JSON or
//!   pretty fmt layer
//! - **Metrics**: Prometheus collectors in a global registry, exported as text
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tm_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//!
//!     // Application code; logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `tiered-mint` | Service name in logs |
//! | `TM_INSTANCE_ID` | `00` | Sale instance identifier |
//! | `TM_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `TM_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `TM_JSON_LOGS` | `false` | JSON instead of pretty logs |

#![warn(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use metrics::{
    encode_metrics, mint_metrics, register_metrics, MetricsHandle, MintMetrics, REGISTRY,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Collectors could not be built or registered.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
///
/// # Errors
///
/// Fails if the metrics cannot be registered or a subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if config.service_name.is_empty() {
        return Err(TelemetryError::Config("service name is empty".to_string()));
    }

    // Initialize metrics first so early requests are counted
    let metrics_handle = register_metrics()?;

    init_tracing(config)?;

    Ok(TelemetryGuard {
        service: config.full_service_name(),
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    service: String,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
