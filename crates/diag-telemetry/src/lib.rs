//! # Diagnostics Telemetry
//!
//! Logging and metrics for the diagnostics layer.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, human or JSON
//!   output
//! - **Metrics**: Prometheus counters and gauges for registration churn and
//!   dropped events
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diag_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Diagnosed endpoints now log and count registration changes
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DIAG_SERVICE_NAME` | `topic-diagnostics` | Service name in logs |
//! | `DIAG_LOG_LEVEL` | `info` | Log level filter |
//! | `DIAG_JSON_LOGS` | `false` | JSON formatted logs |
//! | `DIAG_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, DEREGISTRATIONS_TOTAL,
    PUBLISHES_DROPPED_TOTAL, REGISTRATIONS_ACTIVE, REGISTRATIONS_TOTAL, TICKS_DROPPED_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so registration changes during startup are counted
    let metrics = register_metrics()?;
    init_logging(&config)?;

    tracing::info!(service = %config.service_name, "Telemetry initialized");
    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
