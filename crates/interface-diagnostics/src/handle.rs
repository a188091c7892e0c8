//! # Registration Handle
//!
//! `TopicDiagnostic` registers itself in the updater but leaves its entry
//! behind when dropped. `RegistrationHandle` owns one such diagnostic and
//! removes the entry when it goes away.
//!
//! The handle is deliberately not `Clone`: a second owner would remove the
//! entry while the first one still ticks it. Moving is fine because `Drop`
//! runs once, on the final owner. To rebind, drop the handle and build a new
//! one.

use diag_msgs::Time;
use diag_telemetry::metrics;
use diagnostic_updater::{FrequencyStatusParam, TimeStampStatusParam, TopicDiagnostic, Updater};
use std::fmt;
use tracing::debug;

use crate::error::Result;

/// One live entry in the updater, removed on drop.
pub struct RegistrationHandle {
    updater: Updater,
    diagnostic: TopicDiagnostic,
}

impl RegistrationHandle {
    /// Register a frequency and stamp-delay diagnostic under `name`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is empty or already registered in `updater`.
    pub fn new(
        name: impl Into<String>,
        updater: &Updater,
        freq: FrequencyStatusParam,
        stamp: TimeStampStatusParam,
    ) -> Result<Self> {
        let diagnostic = TopicDiagnostic::new(name, updater, freq, stamp)?;
        metrics::record_registration();
        debug!(diagnostic = %diagnostic.name(), "Diagnostic registered");
        Ok(Self {
            updater: updater.clone(),
            diagnostic,
        })
    }

    /// Record one event observed now.
    pub fn tick(&self) {
        self.tick_at(self.updater.clock().now());
    }

    /// Record one event carrying `stamp`.
    pub fn tick_at(&self, stamp: Time) {
        self.diagnostic.tick_at(stamp);
    }

    pub fn name(&self) -> &str {
        self.diagnostic.name()
    }

    /// The registered policies, as the updater reads them.
    pub fn diagnostic(&self) -> &TopicDiagnostic {
        &self.diagnostic
    }
}

impl Drop for RegistrationHandle {
    fn drop(&mut self) {
        let name = self.diagnostic.name();
        self.updater.remove_by_name(name);
        metrics::record_deregistration();
        debug!(diagnostic = %name, "Diagnostic deregistered");
    }
}

impl fmt::Debug for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("name", &self.name())
            .finish()
    }
}
