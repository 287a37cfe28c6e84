//! One-sided acceptance of the first and last samples.

use crate::sample::{ReconstructParams, Sample};

/// Accept each endpoint at its raw value when the step to its only neighbour is
/// plausible. Returns `(first_accepted, last_accepted)`. Needs `n >= 2`.
pub(crate) fn correct_endpoints(
    samples: &[Sample],
    elapsed: &[f64],
    corrected: &mut [Option<f64>],
    params: &ReconstructParams,
) -> (bool, bool) {
    let n = samples.len();
    if n < 2 {
        return (false, false);
    }
    let within = |diff: f64, dt: f64| diff >= 0.0 && diff < params.max_speed * dt;

    let first = corrected[1].is_some_and(|next| {
        within(next - samples[0].raw_miles, elapsed[1] - elapsed[0])
    });
    if first {
        corrected[0] = Some(samples[0].raw_miles);
    }

    let last = corrected[n - 2].is_some_and(|prev| {
        within(samples[n - 1].raw_miles - prev, elapsed[n - 1] - elapsed[n - 2])
    });
    if last {
        corrected[n - 1] = Some(samples[n - 1].raw_miles);
    }

    (first, last)
}
