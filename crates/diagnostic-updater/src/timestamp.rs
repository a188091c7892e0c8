//! Header-stamp delay policy.
//!
//! Each tick records `now - stamp`. A cycle is an error if any delay fell
//! outside `[min_acceptable, max_acceptable]` or a zero stamp was seen.

use crate::status::DiagnosticStatusWrapper;
use crate::task::DiagnosticTask;
use diag_msgs::{Clock, Level, Time};
use parking_lot::Mutex;
use std::sync::Arc;

/// Acceptable delay range in seconds. Negative delays are stamps from the
/// future.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStampStatusParam {
    pub min_acceptable: f64,
    pub max_acceptable: f64,
}

impl TimeStampStatusParam {
    pub fn new(min_acceptable: f64, max_acceptable: f64) -> Self {
        Self {
            min_acceptable,
            max_acceptable,
        }
    }
}

impl Default for TimeStampStatusParam {
    fn default() -> Self {
        Self::new(-1.0, 5.0)
    }
}

#[derive(Default)]
struct DelayStats {
    early_count: u64,
    late_count: u64,
    zero_count: u64,
    zero_seen: bool,
    max_delta: f64,
    min_delta: f64,
    deltas_valid: bool,
}

/// Delay check. Clones share the same statistics.
#[derive(Clone)]
pub struct TimeStampStatus {
    params: TimeStampStatusParam,
    stats: Arc<Mutex<DelayStats>>,
    clock: Arc<dyn Clock>,
}

impl TimeStampStatus {
    pub fn new(params: TimeStampStatusParam, clock: Arc<dyn Clock>) -> Self {
        Self {
            params,
            stats: Arc::new(Mutex::new(DelayStats::default())),
            clock,
        }
    }

    /// Record one message stamped at `stamp`.
    pub fn tick(&self, stamp: Time) {
        let mut stats = self.stats.lock();
        if stamp.is_zero() {
            stats.zero_seen = true;
            return;
        }

        let delta = self.clock.now().seconds_since(stamp);
        if !stats.deltas_valid || delta > stats.max_delta {
            stats.max_delta = delta;
        }
        if !stats.deltas_valid || delta < stats.min_delta {
            stats.min_delta = delta;
        }
        stats.deltas_valid = true;
    }

    pub fn params(&self) -> TimeStampStatusParam {
        self.params
    }
}

impl DiagnosticTask for TimeStampStatus {
    fn name(&self) -> &str {
        "Timestamp Status"
    }

    fn run(&mut self, stat: &mut DiagnosticStatusWrapper) {
        let mut stats = self.stats.lock();

        stat.summary(Level::Ok, "Timestamps are reasonable.");
        if !stats.deltas_valid {
            stat.summary(Level::Warn, "No data since last update.");
        } else {
            if stats.min_delta < self.params.min_acceptable {
                stat.summary(Level::Error, "Timestamps too far in future seen.");
                stats.early_count += 1;
            }
            if stats.max_delta > self.params.max_acceptable {
                stat.summary(Level::Error, "Timestamps too far in past seen.");
                stats.late_count += 1;
            }
            if stats.zero_seen {
                stat.summary(Level::Error, "Zero timestamp seen.");
                stats.zero_count += 1;
            }
        }

        stat.add("Earliest timestamp delay:", format!("{:.6}", stats.min_delta));
        stat.add("Latest timestamp delay:", format!("{:.6}", stats.max_delta));
        stat.add(
            "Earliest acceptable timestamp delay:",
            format!("{:.6}", self.params.min_acceptable),
        );
        stat.add(
            "Latest acceptable timestamp delay:",
            format!("{:.6}", self.params.max_acceptable),
        );
        stat.add("Late diagnostic update count:", stats.late_count);
        stat.add("Early diagnostic update count:", stats.early_count);
        stat.add("Zero seen diagnostic update count:", stats.zero_count);

        stats.deltas_valid = false;
        stats.min_delta = 0.0;
        stats.max_delta = 0.0;
        stats.zero_seen = false;
    }
}
