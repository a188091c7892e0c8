//! Policy bundles registered under a single name.

use crate::error::UpdaterError;
use crate::frequency::{FrequencyStatus, FrequencyStatusParam};
use crate::task::CompositeDiagnosticTask;
use crate::timestamp::{TimeStampStatus, TimeStampStatusParam};
use crate::updater::Updater;
use diag_msgs::Time;

/// Frequency check for a topic whose messages carry no stamp.
///
/// Registers a composite task on construction. Dropping this value does
/// NOT remove the task from the updater.
pub struct HeaderlessTopicDiagnostic {
    name: String,
    freq: FrequencyStatus,
}

impl HeaderlessTopicDiagnostic {
    pub fn new(
        name: impl Into<String>,
        updater: &Updater,
        freq: FrequencyStatusParam,
    ) -> Result<Self, UpdaterError> {
        let name = name.into();
        let freq = FrequencyStatus::new(freq, updater.clock());

        let mut composite = CompositeDiagnosticTask::new(name.clone());
        composite.add_task(Box::new(freq.clone()));
        updater.add(Box::new(composite))?;

        Ok(Self { name, freq })
    }

    /// Record one event.
    pub fn tick(&self) {
        self.freq.tick();
    }

    /// Restart the frequency window.
    pub fn clear_window(&self) {
        self.freq.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Frequency and stamp-delay checks for a topic of stamped messages.
///
/// Registers a composite task on construction. Dropping this value does
/// NOT remove the task from the updater.
pub struct TopicDiagnostic {
    name: String,
    freq: FrequencyStatus,
    stamp: TimeStampStatus,
}

impl TopicDiagnostic {
    pub fn new(
        name: impl Into<String>,
        updater: &Updater,
        freq: FrequencyStatusParam,
        stamp: TimeStampStatusParam,
    ) -> Result<Self, UpdaterError> {
        let name = name.into();
        let freq = FrequencyStatus::new(freq, updater.clock());
        let stamp = TimeStampStatus::new(stamp, updater.clock());

        let mut composite = CompositeDiagnosticTask::new(name.clone());
        composite.add_task(Box::new(freq.clone()));
        composite.add_task(Box::new(stamp.clone()));
        updater.add(Box::new(composite))?;

        Ok(Self { name, freq, stamp })
    }

    /// Record one event stamped at `stamp`.
    pub fn tick_at(&self, stamp: Time) {
        self.freq.tick();
        self.stamp.tick(stamp);
    }

    /// Restart the frequency window.
    pub fn clear_window(&self) {
        self.freq.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frequency(&self) -> &FrequencyStatus {
        &self.freq
    }

    pub fn timestamp(&self) -> &TimeStampStatus {
        &self.stamp
    }
}
