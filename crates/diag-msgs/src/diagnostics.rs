//! # Diagnostic Status Messages
//!
//! The updater publishes one `DiagnosticArray` per update cycle, holding a
//! `DiagnosticStatus` for every registered task.

use crate::header::{HasHeader, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health level of a diagnostic status. Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    /// Everything nominal.
    #[default]
    Ok = 0,
    /// Degraded but functional.
    Warn = 1,
    /// Not functional.
    Error = 2,
    /// No recent information.
    Stale = 3,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Stale => "STALE",
        };
        f.write_str(s)
    }
}

/// A named value attached to a status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Status of a single diagnostic task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticStatus {
    /// Health level.
    pub level: Level,
    /// Task name, prefixed with the node name by the updater.
    pub name: String,
    /// Human readable summary.
    pub message: String,
    /// Hardware the task reports on.
    pub hardware_id: String,
    /// Detail values.
    pub values: Vec<KeyValue>,
}

impl DiagnosticStatus {
    /// Look up a detail value by key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }
}

/// All statuses of one update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticArray {
    pub header: Header,
    pub status: Vec<DiagnosticStatus>,
}

impl DiagnosticArray {
    /// Find a status by its full (prefixed) name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&DiagnosticStatus> {
        self.status.iter().find(|s| s.name == name)
    }
}

impl HasHeader for DiagnosticArray {
    fn header(&self) -> &Header {
        &self.header
    }
}
