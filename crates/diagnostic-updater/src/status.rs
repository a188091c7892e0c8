//! Status accumulator handed to diagnostic tasks.

use diag_msgs::{DiagnosticStatus, KeyValue, Level};
use std::fmt::Display;

/// Mutable status a task fills in while it runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticStatusWrapper {
    level: Level,
    message: String,
    name: String,
    hardware_id: String,
    values: Vec<KeyValue>,
}

impl DiagnosticStatusWrapper {
    pub fn new(name: impl Into<String>, hardware_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hardware_id: hardware_id.into(),
            ..Default::default()
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[KeyValue] {
        &self.values
    }

    /// Overwrite level and message.
    pub fn summary(&mut self, level: Level, message: impl Into<String>) {
        self.level = level;
        self.message = message.into();
    }

    /// Copy level and message from another status.
    pub fn summary_from(&mut self, other: &DiagnosticStatusWrapper) {
        self.summary(other.level, other.message.clone());
    }

    /// Reset to `Ok` with no message.
    pub fn clear_summary(&mut self) {
        self.summary(Level::Ok, "");
    }

    /// Combine with another result, keeping the worst level.
    ///
    /// Messages of non-ok results are joined with `"; "`; a worse result
    /// replaces an ok message.
    pub fn merge_summary(&mut self, level: Level, message: &str) {
        if level > Level::Ok && self.level > Level::Ok {
            if !self.message.is_empty() {
                self.message.push_str("; ");
            }
            self.message.push_str(message);
        } else if level > self.level {
            self.message = message.to_string();
        }

        if level > self.level {
            self.level = level;
        }
    }

    pub fn merge_summary_from(&mut self, other: &DiagnosticStatusWrapper) {
        self.merge_summary(other.level, &other.message);
    }

    /// Append a detail value.
    pub fn add(&mut self, key: impl Into<String>, value: impl Display) {
        self.values.push(KeyValue::new(key, value.to_string()));
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn into_status(self) -> DiagnosticStatus {
        DiagnosticStatus {
            level: self.level,
            name: self.name,
            message: self.message,
            hardware_id: self.hardware_id,
            values: self.values,
        }
    }
}
