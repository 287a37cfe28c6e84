//! One-shot reconstruction of an odometer export.

use eyre::WrapErr;
use odo_core::util::mph_to_miles_per_sec;
use odo_core::{OdometerReconstructor, ReconstructParams, Reconstruction, Sample};
use odo_traits::SampleSource;
use serde_json::json;

use crate::cli::ReconstructArgs;
use crate::sources::{CsvSamples, write_atomic};

pub fn run_reconstruct(cfg: &odo_config::Config, args: &ReconstructArgs, json: bool) -> eyre::Result<()> {
    let path = args
        .samples
        .clone()
        .unwrap_or_else(|| cfg.sources.samples_csv.clone());
    let start = match &args.start {
        Some(s) => odo_config::parse_timestamp(s)?,
        None => {
            cfg.current_run()
                .ok_or_else(|| eyre::eyre!("no current run in [[runs]]"))?
                .start
        }
    };
    let mut params = ReconstructParams::from(&cfg.reconstruction);
    if let Some(mph) = args.max_speed_mph {
        params.max_speed = mph_to_miles_per_sec(mph);
    }

    let records = CsvSamples::new(&path)
        .samples_since(start)
        .map_err(|e| eyre::eyre!("read samples {path:?}: {e}"))?;
    let samples: Vec<Sample> = records.into_iter().map(Sample::from).collect();

    let rec = OdometerReconstructor::new(params, start)?.reconstruct(&samples)?;

    if let Some(out) = &args.out {
        let body = rec.buckets.to_json()?;
        write_atomic(out, &body).wrap_err_with(|| format!("write {out:?}"))?;
        tracing::info!(path = ?out, buckets = rec.buckets.len(), "series written");
    }

    print_summary(&rec, json);
    Ok(())
}

fn print_summary(rec: &Reconstruction, json: bool) {
    let good = rec.classification.good_indices().len();
    let suspect = rec.classification.suspect_indices().len();
    let last_miles = rec.corrected.iter().rev().find_map(|c| *c);
    if json {
        let line = json!({
            "samples": rec.corrected.len(),
            "good": good,
            "suspect": suspect,
            "accepted": rec.repair.accepted,
            "interpolated": rec.repair.interpolated,
            "unresolved": rec.repair.unresolved,
            "resolved": rec.resolved_count(),
            "first_accepted": rec.first_accepted,
            "last_accepted": rec.last_accepted,
            "buckets": rec.buckets.len(),
            "last_miles": last_miles,
        });
        println!("{line}");
        return;
    }
    println!("samples:      {}", rec.corrected.len());
    println!("good:         {good}");
    println!(
        "suspect:      {suspect} (accepted {}, interpolated {}, unresolved {})",
        rec.repair.accepted, rec.repair.interpolated, rec.repair.unresolved
    );
    println!("resolved:     {}", rec.resolved_count());
    println!("buckets:      {}", rec.buckets.len());
    match last_miles {
        Some(m) => println!("last miles:   {m:.2}"),
        None => println!("last miles:   -"),
    }
}
