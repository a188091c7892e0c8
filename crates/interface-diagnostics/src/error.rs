//! Error types for diagnosed endpoints.

use diagnostic_updater::UpdaterError;
use thiserror::Error;
use topic_bus::BusError;

/// Errors raised while binding an endpoint or registering its diagnostic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiagnosticsError {
    /// The aggregator rejected the registration.
    ///
    /// `UpdaterError::DuplicateName` here means two live endpoints derived
    /// the same name.
    #[error("Diagnostic registration failed: {0}")]
    Updater(#[from] UpdaterError),

    /// The underlying subscription could not be bound.
    #[error("Subscription failed: {0}")]
    Bus(#[from] BusError),
}

/// Result alias for diagnosed endpoint operations.
pub type Result<T> = std::result::Result<T, DiagnosticsError>;
