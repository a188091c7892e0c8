//! Live thresholds shared between a threshold owner and the aggregator.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An `f64` that several handles read and write.
///
/// Clones observe each other's writes, so a policy registered in the
/// updater sees threshold changes made later by the endpoint that owns it.
#[derive(Clone)]
pub struct SharedBound {
    bits: Arc<AtomicU64>,
}

impl SharedBound {
    /// Create a bound holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(value.to_bits())),
        }
    }

    /// A bound that never triggers (`+inf`).
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(f64::INFINITY)
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Replace the value; visible to every clone.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedBound {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for SharedBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedBound").field(&self.get()).finish()
    }
}
