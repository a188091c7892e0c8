//! Event-rate policy.
//!
//! Keeps a ring of `(time, event count)` samples, one per update cycle. The
//! reported frequency is measured over the last `window_size` cycles.

use crate::bound::SharedBound;
use crate::status::DiagnosticStatusWrapper;
use crate::task::DiagnosticTask;
use diag_msgs::{Clock, Level, Time};
use parking_lot::Mutex;
use std::sync::Arc;

/// Acceptable event-rate bounds.
///
/// `min_freq` and `max_freq` are live: changing the `SharedBound` the
/// parameters were built from changes the check of an already registered
/// policy.
#[derive(Debug, Clone)]
pub struct FrequencyStatusParam {
    pub min_freq: SharedBound,
    pub max_freq: SharedBound,
    /// Fraction the rate may deviate from the bounds before warning.
    pub tolerance: f64,
    /// Number of update cycles the rate is averaged over.
    pub window_size: usize,
}

impl FrequencyStatusParam {
    /// Default number of cycles in the window.
    pub const DEFAULT_WINDOW_SIZE: usize = 5;

    /// Bind to the given bounds.
    pub fn new(min_freq: &SharedBound, max_freq: &SharedBound, tolerance: f64) -> Self {
        Self {
            min_freq: min_freq.clone(),
            max_freq: max_freq.clone(),
            tolerance,
            window_size: Self::DEFAULT_WINDOW_SIZE,
        }
    }

    /// Builder-style method to set the window size (at least 1)
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }
}

struct FrequencyWindow {
    count: u64,
    times: Vec<Time>,
    seq_nums: Vec<u64>,
    hist_idx: usize,
}

impl FrequencyWindow {
    fn new(window_size: usize, now: Time) -> Self {
        Self {
            count: 0,
            times: vec![now; window_size],
            seq_nums: vec![0; window_size],
            hist_idx: 0,
        }
    }
}

/// Event-rate check. Clones share the same counters.
#[derive(Clone)]
pub struct FrequencyStatus {
    params: FrequencyStatusParam,
    window: Arc<Mutex<FrequencyWindow>>,
    clock: Arc<dyn Clock>,
}

impl FrequencyStatus {
    pub fn new(params: FrequencyStatusParam, clock: Arc<dyn Clock>) -> Self {
        let window_size = params.window_size.max(1);
        let window = FrequencyWindow::new(window_size, clock.now());
        Self {
            params,
            window: Arc::new(Mutex::new(window)),
            clock,
        }
    }

    /// Record one event.
    pub fn tick(&self) {
        self.window.lock().count += 1;
    }

    /// Reset counters and restart the window at the current time.
    pub fn clear(&self) {
        let now = self.clock.now();
        let mut window = self.window.lock();
        let size = window.times.len();
        *window = FrequencyWindow::new(size, now);
    }

    /// Events since creation or the last `clear`.
    pub fn count(&self) -> u64 {
        self.window.lock().count
    }

    pub fn params(&self) -> &FrequencyStatusParam {
        &self.params
    }
}

impl DiagnosticTask for FrequencyStatus {
    fn name(&self) -> &str {
        "Frequency Status"
    }

    fn run(&mut self, stat: &mut DiagnosticStatusWrapper) {
        let now = self.clock.now();
        let (events, count, window_secs) = {
            let mut window = self.window.lock();
            let idx = window.hist_idx;
            let events = window.count - window.seq_nums[idx];
            let window_secs = now.seconds_since(window.times[idx]);

            window.seq_nums[idx] = window.count;
            window.times[idx] = now;
            window.hist_idx = (idx + 1) % window.times.len();
            (events, window.count, window_secs)
        };

        let freq = events as f64 / window_secs;
        let min_freq = self.params.min_freq.get();
        let max_freq = self.params.max_freq.get();
        let tolerance = self.params.tolerance;

        if events == 0 {
            stat.summary(Level::Error, "No events recorded.");
        } else if freq < min_freq * (1.0 - tolerance) {
            stat.summary(Level::Warn, "Frequency too low.");
        } else if freq > max_freq * (1.0 + tolerance) {
            stat.summary(Level::Warn, "Frequency too high.");
        } else {
            stat.summary(Level::Ok, "Desired frequency met");
        }

        stat.add("Events in window", events);
        stat.add("Events since startup", count);
        stat.add("Duration of window (s)", window_secs);
        stat.add("Actual frequency (Hz)", freq);
        if min_freq == max_freq {
            stat.add("Target frequency (Hz)", min_freq);
        }
        if min_freq > 0.0 {
            stat.add("Minimum acceptable frequency (Hz)", min_freq * (1.0 - tolerance));
        }
        if max_freq.is_finite() {
            stat.add("Maximum acceptable frequency (Hz)", max_freq * (1.0 + tolerance));
        }
    }
}
