//! The full reconstruction pass: classify, repair, fix endpoints, resample.

use chrono::{DateTime, Utc};

use crate::boundary::correct_endpoints;
use crate::bucket::BucketedSeries;
use crate::error::ReconstructError;
use crate::filter::{Classification, classify};
use crate::interpolate::{RepairStats, repair_suspects};
use crate::sample::{ReconstructParams, Sample, elapsed_seconds};

/// Fewest samples with at least one interior index to classify.
pub const MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub classification: Classification,
    /// Index-aligned with the input; `None` is unresolved.
    pub corrected: Vec<Option<f64>>,
    pub buckets: BucketedSeries,
    pub repair: RepairStats,
    pub first_accepted: bool,
    pub last_accepted: bool,
}

impl Reconstruction {
    pub fn resolved_count(&self) -> usize {
        self.corrected.iter().filter(|c| c.is_some()).count()
    }
}

/// Odometer reconstructor for one run. Holds only constants; every call is
/// independent of the previous ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdometerReconstructor {
    params: ReconstructParams,
    start: DateTime<Utc>,
}

impl OdometerReconstructor {
    pub fn new(params: ReconstructParams, start: DateTime<Utc>) -> Result<Self, ReconstructError> {
        params.validate()?;
        Ok(Self { params, start })
    }

    pub fn params(&self) -> &ReconstructParams {
        &self.params
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn reconstruct(&self, samples: &[Sample]) -> Result<Reconstruction, ReconstructError> {
        reconstruct(samples, self.start, &self.params)
    }
}

/// Reconstruct a plausible mileage curve from raw odometer samples and resample
/// it onto one-minute buckets starting at `start`.
pub fn reconstruct(
    samples: &[Sample],
    start: DateTime<Utc>,
    params: &ReconstructParams,
) -> Result<Reconstruction, ReconstructError> {
    params.validate()?;
    if samples.len() < MIN_SAMPLES {
        return Err(ReconstructError::InsufficientData {
            got: samples.len(),
            needed: MIN_SAMPLES,
        });
    }

    let elapsed = elapsed_seconds(samples);
    let classification = classify(samples, &elapsed, params);

    let mut corrected: Vec<Option<f64>> = samples
        .iter()
        .zip(classification.verdicts())
        .map(|(s, v)| v.is_good().then_some(s.raw_miles))
        .collect();

    let repair = repair_suspects(samples, &elapsed, &classification, &mut corrected, params);
    let (first_accepted, last_accepted) =
        correct_endpoints(samples, &elapsed, &mut corrected, params);
    let buckets = BucketedSeries::resample(samples, &corrected, start, params.max_span_minutes);

    tracing::debug!(
        samples = samples.len(),
        good = classification.good_indices().len(),
        accepted = repair.accepted,
        interpolated = repair.interpolated,
        unresolved = repair.unresolved,
        buckets = buckets.len(),
        "odometer reconstructed"
    );

    Ok(Reconstruction {
        classification,
        corrected,
        buckets,
        repair,
        first_accepted,
        last_accepted,
    })
}
