//! Prometheus metrics for diagnostic registrations.
//!
//! All metrics follow the naming convention: `diag_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., registrations_total)
//! - **Gauge**: Value that can go up or down (e.g., registrations_active)

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Registrations currently held by diagnosed endpoints
    pub static ref REGISTRATIONS_ACTIVE: IntGauge = IntGauge::new(
        "diag_registrations_active",
        "Number of diagnostic registrations currently held by endpoints"
    ).expect("metric creation failed");

    /// Registrations created, including replacements
    pub static ref REGISTRATIONS_TOTAL: IntCounter = IntCounter::new(
        "diag_registrations_total",
        "Total diagnostic registrations created"
    ).expect("metric creation failed");

    /// Registrations removed on drop or re-derivation
    pub static ref DEREGISTRATIONS_TOTAL: IntCounter = IntCounter::new(
        "diag_deregistrations_total",
        "Total diagnostic registrations removed"
    ).expect("metric creation failed");

    /// Messages that arrived while no registration was live
    pub static ref TICKS_DROPPED_TOTAL: IntCounter = IntCounter::new(
        "diag_ticks_dropped_total",
        "Messages received while no diagnostic registration existed"
    ).expect("metric creation failed");

    /// Publishes on an endpoint that had no underlying publisher yet
    pub static ref PUBLISHES_DROPPED_TOTAL: IntCounter = IntCounter::new(
        "diag_publishes_dropped_total",
        "Publish calls dropped because no endpoint was assigned"
    ).expect("metric creation failed");
}

/// Handle to the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; metrics that are already registered are
/// left as they are.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REGISTRATIONS_ACTIVE.clone()),
        Box::new(REGISTRATIONS_TOTAL.clone()),
        Box::new(DEREGISTRATIONS_TOTAL.clone()),
        Box::new(TICKS_DROPPED_TOTAL.clone()),
        Box::new(PUBLISHES_DROPPED_TOTAL.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Record a new registration.
pub fn record_registration() {
    REGISTRATIONS_TOTAL.inc();
    REGISTRATIONS_ACTIVE.inc();
}

/// Record a removed registration.
pub fn record_deregistration() {
    DEREGISTRATIONS_TOTAL.inc();
    REGISTRATIONS_ACTIVE.dec();
}
