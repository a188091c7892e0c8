//! # Diagnostic Updater
//!
//! Aggregates named health checks and publishes their status periodically.
//!
//! ## Components
//!
//! - **Updater** (`updater`): name-keyed, insertion-ordered task table;
//!   `add` rejects duplicate names, `remove_by_name` deletes.
//! - **Tasks** (`task`, `status`): `DiagnosticTask`, composites and the
//!   `DiagnosticStatusWrapper` they report into.
//! - **Policies** (`frequency`, `timestamp`): event-rate window and
//!   header-stamp delay checks.
//! - **Topic diagnostics** (`topic`, `publisher`): policy bundles registered
//!   under one name, and a publisher that ticks on every message.
//!
//! ## Ownership
//!
//! `TopicDiagnostic` registers itself on construction and never removes its
//! entry. Callers that re-create diagnostics under the same name must call
//! `Updater::remove_by_name` first or `add` fails with
//! `UpdaterError::DuplicateName`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let updater = Updater::builder().bus(&bus).build()?;
//! let min = SharedBound::new(10.0);
//! let max = SharedBound::unbounded();
//! let diag = TopicDiagnostic::new(
//!     "/scan subscriber",
//!     &updater,
//!     FrequencyStatusParam::new(&min, &max, 0.1),
//!     TimeStampStatusParam::new(-1.0, 0.5),
//! )?;
//! diag.tick_at(msg.header.stamp);
//! updater.update();
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bound;
pub mod config;
pub mod error;
pub mod frequency;
pub mod publisher;
pub mod status;
pub mod task;
pub mod timestamp;
pub mod topic;
pub mod updater;

// Re-exports for convenience
pub use bound::SharedBound;
pub use config::UpdaterConfig;
pub use error::UpdaterError;
pub use frequency::{FrequencyStatus, FrequencyStatusParam};
pub use publisher::{topic_status_name, DiagnosedPublisher};
pub use status::DiagnosticStatusWrapper;
pub use task::{CompositeDiagnosticTask, DiagnosticTask, FunctionDiagnosticTask};
pub use timestamp::{TimeStampStatus, TimeStampStatusParam};
pub use topic::{HeaderlessTopicDiagnostic, TopicDiagnostic};
pub use updater::{RegistryObserver, Updater, UpdaterBuilder};

/// Topic the updater publishes `DiagnosticArray` messages on by default.
pub const DIAGNOSTICS_TOPIC: &str = "/diagnostics";
