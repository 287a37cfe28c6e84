#![no_main]
use chrono::{DateTime, TimeDelta, Utc};
use libfuzzer_sys::fuzz_target;
use odo_core::{ReconstructParams, Sample, reconstruct};

fn shifted(t0: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    t0.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

fuzz_target!(|input: (i32, Vec<(i64, f64)>)| {
    let (start_offset, points) = input;
    let t0 = DateTime::UNIX_EPOCH + TimeDelta::days(19_000);
    // Offsets span the whole calendar; only unrepresentable instants are dropped.
    let samples: Vec<Sample> = points
        .iter()
        .filter_map(|&(s, m)| shifted(t0, s).map(|t| Sample::new(t, m)))
        .collect();
    let Some(start) = shifted(t0, i64::from(start_offset)) else {
        return;
    };
    let params = ReconstructParams::default();
    if let Ok(r) = reconstruct(&samples, start, &params) {
        assert_eq!(r.corrected.len(), samples.len());
        assert!(r.buckets.len() <= params.max_span_minutes);
        let _ = r.buckets.to_json();
    }
});
