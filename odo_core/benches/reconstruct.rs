use chrono::{TimeDelta, TimeZone, Utc};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use odo_core::{ReconstructParams, Sample, reconstruct};

// Synthetic run: one sample every 20 s at ~30 mph, with a glitch roughly
// every 500 readings (spike, rollback or short plateau).
fn synth_run(n: usize, seed: u32) -> Vec<Sample> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let t0 = Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap();
    let mut miles = 0.0f64;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        miles += 20.0 * 30.0 / 3600.0 * next_f64();
        let glitch = next_f64();
        let raw = if glitch < 0.001 {
            miles + 9000.0
        } else if glitch < 0.002 {
            miles * 0.5
        } else {
            miles
        };
        out.push(Sample::new(t0 + TimeDelta::seconds(i as i64 * 20), raw));
    }
    out
}

pub fn bench_reconstruct(c: &mut Criterion) {
    let mut g = c.benchmark_group("reconstruct");
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p odo_core --bench reconstruct
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(30);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let params = ReconstructParams::default();
    let start = Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap();
    // One hour, one day, one full week of 20 s samples.
    for &n in &[180usize, 4_320, 30_240] {
        let run = synth_run(n, 0xB05);
        g.bench_function(format!("samples_{n}"), |b| {
            b.iter_batched(
                || run.clone(),
                |s| {
                    let r = reconstruct(black_box(&s), start, black_box(&params));
                    black_box(r.ok());
                },
                BatchSize::LargeInput,
            )
        });
    }
    g.finish();
}

criterion_group!(reconstruction, bench_reconstruct);
criterion_main!(reconstruction);
