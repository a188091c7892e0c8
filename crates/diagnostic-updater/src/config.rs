//! Updater configuration from environment variables.

use crate::error::UpdaterError;
use crate::DIAGNOSTICS_TOPIC;
use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for an `Updater`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Prefix for status names (`"<node>: <task>"`); empty for no prefix
    pub node_name: String,

    /// Hardware identifier stamped on every status
    pub hardware_id: String,

    /// Seconds between periodic updates
    pub period_secs: f64,

    /// Topic the `DiagnosticArray` is published on
    pub topic: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            node_name: String::new(),
            hardware_id: "none".to_string(),
            period_secs: 1.0,
            topic: DIAGNOSTICS_TOPIC.to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DIAG_NODE_NAME`: Status name prefix (default: empty)
    /// - `DIAG_HARDWARE_ID`: Hardware id (default: none)
    /// - `DIAG_PERIOD`: Update period in seconds (default: 1.0)
    /// - `DIAG_TOPIC`: Output topic (default: /diagnostics)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            node_name: env::var("DIAG_NODE_NAME").unwrap_or(defaults.node_name),

            hardware_id: env::var("DIAG_HARDWARE_ID").unwrap_or(defaults.hardware_id),

            period_secs: env::var("DIAG_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.period_secs),

            topic: env::var("DIAG_TOPIC").unwrap_or(defaults.topic),
        }
    }

    /// Builder-style method to set the node name
    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = node_name.into();
        self
    }

    /// Builder-style method to set the hardware id
    pub fn with_hardware_id(mut self, hardware_id: impl Into<String>) -> Self {
        self.hardware_id = hardware_id.into();
        self
    }

    /// Builder-style method to set the update period
    pub fn with_period(mut self, period_secs: f64) -> Self {
        self.period_secs = period_secs;
        self
    }

    /// Full status name for a task.
    pub fn status_name(&self, task_name: &str) -> String {
        if self.node_name.is_empty() {
            task_name.to_string()
        } else {
            format!("{}: {}", self.node_name, task_name)
        }
    }

    /// Reject periods that would never or always fire, and empty topics.
    pub fn validate(&self) -> Result<(), UpdaterError> {
        if !self.period_secs.is_finite() || self.period_secs <= 0.0 {
            return Err(UpdaterError::InvalidConfig(format!(
                "period_secs must be positive, got {}",
                self.period_secs
            )));
        }

        if self.topic.is_empty() {
            return Err(UpdaterError::InvalidConfig(
                "topic cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
