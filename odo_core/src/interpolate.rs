//! Repair of suspect runs.
//!
//! A suspect sample whose raw value is consistent with both the nearest
//! resolved sample before it and the sample closing the run is taken as-is.
//! Whatever is left is bridged linearly between the resolved values on either
//! side, or left unresolved when no bridge stays within the speed limit.

use crate::filter::Classification;
use crate::runs::contiguous_runs;
use crate::sample::{ReconstructParams, Sample};

/// What happened to the suspect samples of one reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Suspect samples accepted at their raw value.
    pub accepted: usize,
    /// Suspect samples replaced by a bridge value.
    pub interpolated: usize,
    /// Suspect samples left unresolved.
    pub unresolved: usize,
}

/// Why a sub-run could not be bridged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    BeforeFirstGood,
    MissingAnchor,
    NonFinite,
    Descending,
    NoTimeSpan,
    TooSteep,
}

/// Resolve suspect runs in place. Good samples must already hold their raw value
/// in `corrected`; endpoints must still be unresolved.
pub(crate) fn repair_suspects(
    samples: &[Sample],
    elapsed: &[f64],
    classification: &Classification,
    corrected: &mut [Option<f64>],
    params: &ReconstructParams,
) -> RepairStats {
    let mut stats = RepairStats::default();
    let first_good = classification.first_good();

    for (start, end) in contiguous_runs(&classification.suspect_indices()) {
        // Suspects never include the last index, so `end + 1` is in bounds.
        let close = end + 1;
        let ceiling = samples[close].raw_miles;
        let mut back = nearest_resolved_before(corrected, start);
        let mut leftover = Vec::new();

        for i in start..=end {
            let raw = samples[i].raw_miles;
            let ok = back.is_some_and(|(j, value)| {
                params.plausible(raw - value, elapsed[i] - elapsed[j])
                    && params.plausible(ceiling - raw, elapsed[close] - elapsed[i])
            });
            if ok {
                corrected[i] = Some(raw);
                back = Some((i, raw));
                stats.accepted += 1;
            } else {
                leftover.push(i);
            }
        }

        for (a, b) in contiguous_runs(&leftover) {
            match bridge(elapsed, corrected, params, first_good, a, b) {
                Ok(()) => stats.interpolated += b - a + 1,
                Err(reason) => {
                    tracing::trace!(start = a, end = b, ?reason, "suspect run left unresolved");
                    stats.unresolved += b - a + 1;
                }
            }
        }
    }

    stats
}

fn nearest_resolved_before(corrected: &[Option<f64>], i: usize) -> Option<(usize, f64)> {
    corrected[..i]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(j, v)| v.map(|v| (j, v)))
}

/// Fill `a..=b` on the line through `(t[a-1], c[a-1])` and `(t[b+1], c[b+1])`.
/// The line must rise no faster than `max_speed`.
fn bridge(
    elapsed: &[f64],
    corrected: &mut [Option<f64>],
    params: &ReconstructParams,
    first_good: Option<usize>,
    a: usize,
    b: usize,
) -> Result<(), Skip> {
    match first_good {
        Some(g) if a >= g => {}
        _ => return Err(Skip::BeforeFirstGood),
    }
    let (before, after) = (a - 1, b + 1);
    let (Some(lo), Some(hi)) = (corrected[before], corrected[after]) else {
        return Err(Skip::MissingAnchor);
    };
    if !lo.is_finite() || !hi.is_finite() {
        return Err(Skip::NonFinite);
    }
    if lo > hi {
        return Err(Skip::Descending);
    }
    let span = elapsed[after] - elapsed[before];
    if !(span > 0.0) {
        return Err(Skip::NoTimeSpan);
    }
    if hi - lo > params.max_speed * span {
        return Err(Skip::TooSteep);
    }

    let m = (hi - lo) / span;
    let c = hi - m * elapsed[after];
    for i in a..=b {
        // Clamp keeps out-of-order timestamps inside the bracket.
        corrected[i] = Some((m * elapsed[i] + c).clamp(lo, hi));
    }
    Ok(())
}
