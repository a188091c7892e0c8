//! Shared test fixtures.

use diag_msgs::{ManualClock, Stamped, Time};
use diagnostic_updater::{RegistryObserver, Updater};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use topic_bus::TopicBus;

/// Stamped payload used throughout the suite.
pub type TestMsg = Stamped<u64>;

/// Counts every change the updater makes to its table.
///
/// `peak` is the highest number of outstanding registrations (adds minus
/// removes) ever observed, checked right after each add.
#[derive(Debug, Default)]
pub struct CountingObserver {
    adds: AtomicUsize,
    removes: AtomicUsize,
    misses: AtomicUsize,
    peak: AtomicI64,
}

impl CountingObserver {
    pub fn adds(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    /// `remove_by_name` calls that found nothing.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::SeqCst)
    }

    pub fn outstanding(&self) -> i64 {
        self.adds() as i64 - self.removes() as i64
    }

    pub fn peak(&self) -> i64 {
        self.peak.load(Ordering::SeqCst)
    }
}

impl RegistryObserver for CountingObserver {
    fn on_add(&self, _name: &str) {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.peak.fetch_max(self.outstanding(), Ordering::SeqCst);
    }

    fn on_remove(&self, _name: &str, removed: bool) {
        if removed {
            self.removes.fetch_add(1, Ordering::SeqCst);
        } else {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Updater on a manual clock with an instrumented table.
pub struct Harness {
    pub updater: Updater,
    pub clock: ManualClock,
    pub bus: TopicBus,
    pub observer: Arc<CountingObserver>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = ManualClock::new(Time::from_secs(1_700_000_000));
        let observer = Arc::new(CountingObserver::default());
        let bus = TopicBus::new();
        let updater = Updater::builder()
            .clock(Arc::new(clock.clone()))
            .observer(observer.clone())
            .bus(&bus)
            .build()
            .expect("default updater config is valid");
        Self {
            updater,
            clock,
            bus,
            observer,
        }
    }

    /// Message stamped `age_secs` before the current clock reading.
    pub fn message(&self, age_secs: f64, data: u64) -> TestMsg {
        Stamped::new(self.clock.now().offset_secs(-age_secs), data)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
