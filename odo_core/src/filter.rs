//! Plausibility filter: sorts interior samples into trusted and suspect.
//!
//! Each interior index is checked against its two neighbours and against the
//! most recent trusted sample. The first rule that fires decides. Endpoints are
//! never classified here; they go through the one-sided boundary check later.

use crate::sample::{ReconstructParams, Sample};

/// Which check flagged a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspectReason {
    /// Negative or too-fast step from the previous sample.
    BackwardJump,
    /// Negative or too-fast step to the next sample.
    ForwardJump,
    /// Behind, or too far ahead of, the last trusted sample.
    AnchorJump,
    /// Large reading before anything has been trusted.
    StartupNoise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// First or last sample; not classified by the filter.
    Endpoint,
    Good,
    Suspect(SuspectReason),
}

impl Verdict {
    pub fn is_good(self) -> bool {
        matches!(self, Verdict::Good)
    }

    pub fn is_suspect(self) -> bool {
        matches!(self, Verdict::Suspect(_))
    }
}

/// Per-sample verdicts, index-aligned with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    verdicts: Vec<Verdict>,
}

impl Classification {
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn verdict(&self, i: usize) -> Option<Verdict> {
        self.verdicts.get(i).copied()
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Ascending indices classified good.
    pub fn good_indices(&self) -> Vec<usize> {
        self.indices_where(Verdict::is_good)
    }

    /// Ascending indices classified suspect.
    pub fn suspect_indices(&self) -> Vec<usize> {
        self.indices_where(Verdict::is_suspect)
    }

    pub fn first_good(&self) -> Option<usize> {
        self.verdicts.iter().position(|v| v.is_good())
    }

    fn indices_where(&self, pred: impl Fn(Verdict) -> bool) -> Vec<usize> {
        self.verdicts
            .iter()
            .enumerate()
            .filter(|(_, v)| pred(**v))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Classify indices `1..n-1`. `elapsed` must be index-aligned with `samples`.
pub fn classify(samples: &[Sample], elapsed: &[f64], params: &ReconstructParams) -> Classification {
    debug_assert_eq!(samples.len(), elapsed.len());
    let n = samples.len();
    let mut verdicts = vec![Verdict::Endpoint; n];
    // The anchor only ever moves to an index classified good in this scan,
    // never to values resolved later by interpolation.
    let mut anchor: Option<usize> = None;

    for i in 1..n.saturating_sub(1) {
        let verdict = judge(samples, elapsed, params, i, anchor);
        if verdict.is_good() {
            anchor = Some(i);
        }
        verdicts[i] = verdict;
    }

    Classification { verdicts }
}

fn judge(
    samples: &[Sample],
    elapsed: &[f64],
    params: &ReconstructParams,
    i: usize,
    anchor: Option<usize>,
) -> Verdict {
    let miles = |k: usize| samples[k].raw_miles;

    if !params.plausible(miles(i) - miles(i - 1), elapsed[i] - elapsed[i - 1]) {
        return Verdict::Suspect(SuspectReason::BackwardJump);
    }
    if !params.plausible(miles(i + 1) - miles(i), elapsed[i + 1] - elapsed[i]) {
        return Verdict::Suspect(SuspectReason::ForwardJump);
    }
    match anchor {
        Some(g) => {
            // Two-sided: a reading below the anchor is as implausible as one
            // too far above it.
            if !params.plausible(miles(i) - miles(g), elapsed[i] - elapsed[g]) {
                return Verdict::Suspect(SuspectReason::AnchorJump);
            }
        }
        None => {
            if miles(i) > params.startup_noise_miles {
                return Verdict::Suspect(SuspectReason::StartupNoise);
            }
        }
    }
    Verdict::Good
}
