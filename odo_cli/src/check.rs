//! `check`: config validation plus a dry read of every configured input.

use std::path::Path;

use serde_json::json;

use crate::config::ConfigInvalid;

pub fn run_check(cfg_path: &Path, cfg: &odo_config::Config, json: bool) -> eyre::Result<()> {
    let invalid = |msg: String| ConfigInvalid::new(cfg_path, msg);

    let samples = odo_config::load_samples_csv(&cfg.sources.samples_csv)
        .map_err(|e| invalid(format!("sources.samples_csv: {e}")))?;

    let events = match &cfg.sources.events_csv {
        Some(p) => Some(
            odo_config::load_events_csv(p)
                .map_err(|e| invalid(format!("sources.events_csv: {e}")))?
                .len(),
        ),
        None => None,
    };

    let mut feeds = Vec::new();
    for run in &cfg.runs {
        if let Some(p) = cfg.sources.donations_path(run.year) {
            let rows = odo_config::load_donation_feed(&p)
                .map_err(|e| invalid(format!("sources.donations (year {}): {e}", run.year)))?;
            feeds.push((run.year, rows.len()));
        }
    }

    if json {
        let feeds: Vec<_> = feeds
            .iter()
            .map(|(year, n)| json!({ "year": year, "entries": n }))
            .collect();
        println!(
            "{}",
            json!({
                "ok": true,
                "samples": samples.len(),
                "events": events,
                "runs": cfg.runs.len(),
                "feeds": feeds,
            })
        );
    } else {
        println!("config OK: {}", cfg_path.display());
        println!("samples: {} rows", samples.len());
        if let Some(n) = events {
            println!("events: {n} rows");
        }
        for (year, n) in &feeds {
            println!("donations {year}: {n} entries");
        }
    }
    Ok(())
}
