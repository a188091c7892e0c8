//! # Time Stamps
//!
//! `Time` is a point in wall-clock time with nanosecond resolution. Message
//! headers carry one, and the timestamp policy compares it with the
//! `Clock` reading at observation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Nanoseconds since the UNIX epoch.
///
/// `Time::ZERO` is the "unset" stamp; the timestamp policy reports it
/// separately from early or late stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Time {
    nanos: u64,
}

impl Time {
    /// The zero (unset) stamp.
    pub const ZERO: Time = Time { nanos: 0 };

    /// Create a stamp from nanoseconds since the epoch.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create a stamp from whole seconds since the epoch.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            nanos: secs.saturating_mul(NANOS_PER_SEC),
        }
    }

    /// Create a stamp from fractional seconds. Negative values clamp to zero.
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs <= 0.0 || !secs.is_finite() {
            return Self::ZERO;
        }
        Self {
            nanos: (secs * NANOS_PER_SEC as f64) as u64,
        }
    }

    /// Current system time.
    #[must_use]
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self { nanos }
    }

    /// Nanoseconds since the epoch.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Fractional seconds since the epoch.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / NANOS_PER_SEC as f64
    }

    /// True for the unset stamp.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    /// Signed difference `self - earlier` in seconds.
    #[must_use]
    pub fn seconds_since(&self, earlier: Time) -> f64 {
        (self.nanos as i128 - earlier.nanos as i128) as f64 / NANOS_PER_SEC as f64
    }

    /// Stamp shifted forward by fractional seconds (backward if negative).
    #[must_use]
    pub fn offset_secs(&self, secs: f64) -> Self {
        let shifted = self.nanos as i128 + (secs * NANOS_PER_SEC as f64) as i128;
        Self {
            nanos: shifted.clamp(0, u64::MAX as i128) as u64,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.nanos / NANOS_PER_SEC,
            self.nanos % NANOS_PER_SEC
        )
    }
}

/// Abstraction over time to enable deterministic tests.
pub trait Clock: Send + Sync + 'static {
    /// Return the current time.
    fn now(&self) -> Time;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Time::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one copy and hand
/// another to the updater.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start`.
    #[must_use]
    pub fn new(start: Time) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(start.as_nanos())),
        }
    }

    /// Current reading.
    #[must_use]
    pub fn now(&self) -> Time {
        Time::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    /// Jump to `time`.
    pub fn set(&self, time: Time) {
        self.nanos.store(time.as_nanos(), Ordering::SeqCst);
    }

    /// Move forward by fractional seconds.
    pub fn advance_secs(&self, secs: f64) {
        let next = self.now().offset_secs(secs);
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        ManualClock::now(self)
    }
}
