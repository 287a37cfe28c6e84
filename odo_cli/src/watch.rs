//! The polling runner wired to files on disk.

use odo_core::{Pipeline, PipelineSettings};
use serde_json::json;

use crate::sources::{CsvEvents, CsvSamples, DirSink, FileFeed};

pub fn run_watch(cfg: &odo_config::Config, once: bool, json: bool) -> eyre::Result<()> {
    let settings = PipelineSettings::try_from(cfg)?;
    let sink = DirSink::create(&cfg.output.dir)?;
    let mut pipeline = Pipeline::new(CsvSamples::new(&cfg.sources.samples_csv), sink, settings);
    if let Some(events) = &cfg.sources.events_csv {
        pipeline = pipeline.with_events(Box::new(CsvEvents::new(events)));
    }
    if let Some(template) = &cfg.sources.donations {
        pipeline = pipeline.with_donations(Box::new(FileFeed::new(template.as_str())));
    }
    pipeline.load_history()?;

    if once {
        let report = pipeline.cycle()?;
        if json {
            let line = json!({
                "samples": report.samples,
                "buckets": report.buckets,
                "events": report.events,
                "donation_points": report.donation_points,
                "odometer_skipped": report.odometer_skipped,
                "artifacts": report.artifacts,
            });
            println!("{line}");
        } else {
            for name in &report.artifacts {
                println!("wrote {}", cfg.output.dir.join(name).display());
            }
            if report.odometer_skipped {
                println!("odometer skipped: not enough samples yet");
            }
        }
        return Ok(());
    }

    let (tx, rx) = crossbeam_channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })?;
    tracing::info!(interval_s = cfg.poll.interval_s, "watching; Ctrl-C to stop");
    let cycles = pipeline.run(&rx);
    if json {
        println!("{}", json!({ "cycles": cycles }));
    }
    Ok(())
}
