//! Error types for the diagnostic updater

use thiserror::Error;
use topic_bus::BusError;

/// Errors that can occur while registering or publishing diagnostics
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UpdaterError {
    #[error("Diagnostic task already registered: {name}")]
    DuplicateName { name: String },

    #[error("Diagnostic task name is empty")]
    EmptyName,

    #[error("Invalid updater configuration: {0}")]
    InvalidConfig(String),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),
}
