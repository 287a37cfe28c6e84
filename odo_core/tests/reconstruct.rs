use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use odo_core::{
    BucketedSeries, MIN_SAMPLES, OdometerReconstructor, ReconstructError, ReconstructParams,
    Sample, SuspectReason, Verdict, reconstruct,
};
use rstest::rstest;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap()
}

fn series(points: &[(i64, f64)]) -> Vec<Sample> {
    points
        .iter()
        .map(|&(s, m)| Sample::new(t0() + TimeDelta::seconds(s), m))
        .collect()
}

fn approx(v: Option<f64>, want: f64) -> bool {
    v.is_some_and(|v| (v - want).abs() < 1e-9)
}

/// Every pair of neighbouring resolved values moves forward no faster than the limit.
fn assert_plausible_curve(samples: &[Sample], corrected: &[Option<f64>], params: &ReconstructParams) {
    let resolved: Vec<(DateTime<Utc>, f64)> = samples
        .iter()
        .zip(corrected)
        .filter_map(|(s, c)| c.map(|v| (s.timestamp, v)))
        .collect();
    for w in resolved.windows(2) {
        let diff = w[1].1 - w[0].1;
        let dt = (w[1].0 - w[0].0).num_milliseconds() as f64 / 1000.0;
        assert!(diff >= 0.0, "runs backwards: {w:?}");
        assert!(diff <= params.max_speed * dt + 1e-9, "too fast: {w:?}");
    }
}

#[rstest]
#[case::empty(&[])]
#[case::one(&[(0, 1.0)])]
#[case::two(&[(0, 1.0), (10, 1.01)])]
fn too_few_samples(#[case] points: &[(i64, f64)]) {
    let err = reconstruct(&series(points), t0(), &ReconstructParams::default()).unwrap_err();
    assert_eq!(
        err,
        ReconstructError::InsufficientData {
            got: points.len(),
            needed: MIN_SAMPLES
        }
    );
}

#[test]
fn steady_drive_is_untouched() {
    let points: Vec<(i64, f64)> = (0..30).map(|k| (k * 20, 10.0 + k as f64 * 0.2)).collect();
    let samples = series(&points);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();

    assert!(r.first_accepted && r.last_accepted);
    assert_eq!(r.classification.suspect_indices(), Vec::<usize>::new());
    assert_eq!(r.repair.accepted + r.repair.interpolated + r.repair.unresolved, 0);
    for (s, c) in samples.iter().zip(&r.corrected) {
        assert_eq!(*c, Some(s.raw_miles));
    }
}

#[test]
fn short_spike_is_never_emitted() {
    // 5 -> 9999 -> 7 at 45 mph: the spike and its leading neighbour are both
    // implausible and nothing before them is trusted.
    let samples = series(&[(0, 0.0), (10, 5.0), (20, 9999.0), (30, 7.0)]);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();
    assert_eq!(
        r.classification.verdict(2),
        Some(Verdict::Suspect(SuspectReason::BackwardJump))
    );
    assert_ne!(r.corrected[2], Some(9999.0));
    assert!(r.buckets.iter().all(|b| b.mean_miles != Some(9999.0)));
}

#[test]
fn spike_between_trusted_samples_is_interpolated() {
    let samples = series(&[
        (0, 0.0),
        (60, 0.5),
        (120, 1.0),
        (180, 9999.0),
        (240, 1.5),
        (300, 2.0),
        (360, 2.5),
        (420, 3.0),
    ]);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();
    // 1.0 and 1.5 either side are accepted as-is, the spike is bridged.
    assert_eq!(r.repair.accepted, 2);
    assert_eq!(r.repair.interpolated, 1);
    assert!(approx(r.corrected[3], 1.25));
    assert!(r.corrected.iter().all(Option::is_some));

    let means: Vec<Option<f64>> = r.buckets.iter().map(|b| b.mean_miles).collect();
    assert_eq!(means.len(), 8);
    assert!(approx(means[3], 1.25));
}

#[test]
fn startup_outlier_is_not_accepted() {
    let samples = series(&[(0, 5000.0), (10, 0.01), (20, 0.02), (30, 0.03), (40, 0.04)]);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();
    assert!(!r.first_accepted);
    assert_eq!(r.corrected[0], None);
    // Index 1 sits before the first trusted sample and stays unresolved.
    assert_eq!(r.corrected[1], None);
    assert_eq!(
        r.buckets.buckets()[0].mean_miles,
        Some((0.02 + 0.03 + 0.04) / 3.0)
    );
}

#[test]
fn startup_garbage_plateau_is_flagged() {
    // Self-consistent garbage passes the neighbour checks; only the
    // no-trusted-sample-yet threshold catches it.
    let samples = series(&[
        (0, 5000.0),
        (10, 5000.0),
        (20, 5000.01),
        (30, 5000.02),
    ]);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();
    assert_eq!(
        r.classification.verdict(1),
        Some(Verdict::Suspect(SuspectReason::StartupNoise))
    );
    assert_eq!(
        r.classification.verdict(2),
        Some(Verdict::Suspect(SuspectReason::StartupNoise))
    );
    assert_eq!(r.resolved_count(), 0);
}

#[test]
fn startup_threshold_is_configurable() {
    let samples = series(&[(0, 5000.0), (10, 5000.0), (20, 5000.01), (30, 5000.02)]);
    let params = ReconstructParams {
        startup_noise_miles: 10_000.0,
        ..ReconstructParams::default()
    };
    let r = reconstruct(&samples, t0(), &params).unwrap();
    assert_eq!(r.classification.good_indices(), vec![1, 2]);
}

#[test]
fn rollback_is_repaired_from_the_anchor() {
    // One reading drops back. Its neighbours are suspect too but consistent
    // with the last trusted value, so only the drop itself is bridged.
    let samples = series(&[
        (0, 10.0),
        (60, 10.5),
        (120, 11.0),
        (180, 2.0),
        (240, 12.0),
        (300, 12.5),
        (360, 13.0),
    ]);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();
    assert_eq!(r.repair.interpolated, 1);
    assert!(approx(r.corrected[3], 11.5));
    for w in r.corrected.windows(2) {
        if let [Some(a), Some(b)] = w {
            assert!(b >= a);
        }
    }
}

#[test]
fn reconstruction_does_not_depend_on_previous_calls() {
    let rec = OdometerReconstructor::new(ReconstructParams::default(), t0()).unwrap();
    let a = series(&[(0, 1.0), (60, 1.5), (120, 2.0), (180, 2.5)]);
    let b = series(&[(0, 7.0), (60, 7.5), (120, 8.0)]);
    let first = rec.reconstruct(&a).unwrap();
    let _ = rec.reconstruct(&b).unwrap();
    assert_eq!(rec.reconstruct(&a).unwrap(), first);
}

#[test]
fn samples_before_the_run_start_are_ignored_by_buckets() {
    let samples = series(&[(-120, 1.0), (-60, 1.5), (0, 2.0), (60, 2.5)]);
    let r = reconstruct(&samples, t0(), &ReconstructParams::default()).unwrap();
    let buckets: &BucketedSeries = &r.buckets;
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets.buckets()[0].mean_miles, Some(2.0));
    assert_eq!(buckets.buckets()[1].mean_miles, Some(2.5));
}

#[test]
fn dip_below_the_trusted_reading_stays_unresolved() {
    // 30 s spacing, 0.375 mi per step at 45 mph. Indices 3..5 climb cleanly
    // from each other but sit below the trusted 10.25 at index 1.
    let samples = series(&[
        (0, 10.0),
        (30, 10.25),
        (60, 10.5),
        (90, 10.0),
        (120, 10.1),
        (150, 10.2),
        (180, 10.75),
    ]);
    let params = ReconstructParams::default();
    let r = reconstruct(&samples, t0(), &params).unwrap();
    assert_eq!(
        r.classification.verdict(4),
        Some(Verdict::Suspect(SuspectReason::AnchorJump))
    );
    assert_eq!(r.corrected[2], Some(10.5));
    assert!(r.corrected[3..].iter().all(Option::is_none));
    assert_plausible_curve(&samples, &r.corrected, &params);
}

#[test]
fn far_future_sample_is_bucketed_only_up_to_the_span_cap() {
    let mut samples = series(&[(0, 1.0), (60, 1.5), (120, 2.0)]);
    let glitch = Utc.with_ymd_and_hms(9999, 1, 1, 0, 0, 0).unwrap();
    samples.push(Sample::new(glitch, 3.0));

    let params = ReconstructParams::default();
    let r = reconstruct(&samples, t0(), &params).unwrap();
    assert_eq!(r.buckets.len(), params.max_span_minutes);
    assert_eq!(r.buckets.buckets()[2].mean_miles, Some(2.0));
    assert!(r.buckets.buckets()[3..].iter().all(|b| b.mean_miles.is_none()));
    assert_eq!(r.buckets.bucket_at(glitch), None);
}

#[test]
fn span_cap_is_configurable() {
    let samples = series(&[(0, 1.0), (60, 1.5), (120, 2.0), (600, 4.0)]);
    let params = ReconstructParams {
        max_span_minutes: 2,
        ..ReconstructParams::default()
    };
    let r = reconstruct(&samples, t0(), &params).unwrap();
    assert_eq!(r.buckets.len(), 2);
    assert_eq!(r.corrected.len(), 4);
}
