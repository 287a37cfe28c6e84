//! Input samples and reconstruction parameters.

use chrono::{DateTime, Utc};
use odo_traits::OdometerRecord;

use crate::error::ReconstructError;
use crate::util::{mph_to_miles_per_sec, seconds_between};

/// Nominal top speed of the bus.
pub const DEFAULT_MAX_SPEED_MPH: f64 = 45.0;
/// Readings above this before any trusted sample are power-on garbage.
pub const DEFAULT_STARTUP_NOISE_MILES: f64 = 1000.0;
/// Longest bucketed span: two weeks of minutes.
pub const DEFAULT_MAX_SPAN_MINUTES: usize = 14 * 24 * 60;

/// One raw cumulative odometer reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub raw_miles: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, raw_miles: f64) -> Self {
        Self {
            timestamp,
            raw_miles,
        }
    }
}

impl From<OdometerRecord> for Sample {
    fn from(r: OdometerRecord) -> Self {
        Self::new(r.timestamp, r.miles)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructParams {
    /// Plausibility bound in miles per second.
    pub max_speed: f64,
    pub startup_noise_miles: f64,
    /// Upper bound on the number of minute buckets. Samples past it are
    /// still reconstructed but not bucketed.
    pub max_span_minutes: usize,
}

impl Default for ReconstructParams {
    fn default() -> Self {
        Self::from_mph(DEFAULT_MAX_SPEED_MPH)
    }
}

impl ReconstructParams {
    pub fn from_mph(mph: f64) -> Self {
        Self {
            max_speed: mph_to_miles_per_sec(mph),
            startup_noise_miles: DEFAULT_STARTUP_NOISE_MILES,
            max_span_minutes: DEFAULT_MAX_SPAN_MINUTES,
        }
    }

    pub fn validate(&self) -> Result<(), ReconstructError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(ReconstructError::InvalidParameter(
                "max_speed must be finite and > 0",
            ));
        }
        if !(self.startup_noise_miles.is_finite() && self.startup_noise_miles >= 0.0) {
            return Err(ReconstructError::InvalidParameter(
                "startup_noise_miles must be finite and >= 0",
            ));
        }
        if self.max_span_minutes == 0 {
            return Err(ReconstructError::InvalidParameter("max_span_minutes must be > 0"));
        }
        Ok(())
    }

    /// True when advancing `diff` miles over `dt` seconds is physically possible:
    /// never backwards and never faster than `max_speed`. Negative `dt` always fails
    /// for a forward move, and NaN fails every comparison.
    #[inline]
    pub(crate) fn plausible(&self, diff: f64, dt: f64) -> bool {
        diff >= 0.0 && diff <= self.max_speed * dt
    }
}

/// Seconds since the first sample, index-aligned with `samples`.
pub(crate) fn elapsed_seconds(samples: &[Sample]) -> Vec<f64> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    samples
        .iter()
        .map(|s| seconds_between(first.timestamp, s.timestamp))
        .collect()
}
