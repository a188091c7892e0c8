//! Thresholds shared by both endpoint adapters.

use diagnostic_updater::{FrequencyStatusParam, SharedBound, TimeStampStatusParam};

/// Frequency bounds and delay limit of one endpoint.
///
/// The frequency bounds are `SharedBound`s: a registration built from them
/// follows later `set` calls without being rebuilt. The delay limit is
/// copied into each registration.
#[derive(Debug, Clone)]
pub(crate) struct Thresholds {
    pub min_freq: SharedBound,
    /// Never configurable; stays `+inf`.
    pub max_freq: SharedBound,
    pub max_time_delay: f64,
}

impl Thresholds {
    pub fn frequency_param(&self) -> FrequencyStatusParam {
        FrequencyStatusParam::new(&self.min_freq, &self.max_freq, 0.0)
    }

    /// Stamps may not be from the future and may lag by `max_time_delay`.
    pub fn stamp_param(&self) -> TimeStampStatusParam {
        TimeStampStatusParam::new(0.0, self.max_time_delay)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_freq: SharedBound::new(0.0),
            max_freq: SharedBound::unbounded(),
            max_time_delay: 0.0,
        }
    }
}
