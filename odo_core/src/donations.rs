//! Donation totals on the bus-time axis, per run.

use chrono::{DateTime, NaiveDate, Utc};
use odo_traits::DonationEntry;
use serde::Serialize;

use crate::util::SECS_PER_HOUR;

/// Keep every n-th point when thinning finished runs.
pub const DECIMATE_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DonationPoint {
    /// Whole seconds since the run start.
    pub bus_seconds: i64,
    pub total: f64,
}

/// One run's donation curve with its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSeries {
    pub year: u32,
    pub label: String,
    pub current: bool,
    pub points: Vec<DonationPoint>,
}

/// `"{prefix} {year}"`; run numbers past 10 are shown as calendar years.
pub fn run_label(prefix: &str, year: u32) -> String {
    let shown = if year > 10 { year + 2006 } else { year };
    format!("{prefix} {shown}")
}

/// Minute-resolution instant of a feed entry; `None` for impossible dates.
pub fn entry_time(e: &DonationEntry) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(e.year, e.month, e.day)?
        .and_hms_opt(e.hour, e.minute, 0)
        .map(|n| n.and_utc())
}

/// Place feed entries on the bus-time axis of a run starting at `start`.
///
/// Entries before the start, or past `end_hour` when given, are dropped. With
/// `decimate`, every fifth remaining entry is kept, starting with the first.
pub fn donation_series(
    entries: &[DonationEntry],
    start: DateTime<Utc>,
    end_hour: Option<f64>,
    decimate: bool,
) -> Vec<DonationPoint> {
    let limit = end_hour.map(|h| h * SECS_PER_HOUR);
    let mut dropped = 0usize;
    let kept = entries.iter().filter_map(|e| {
        let Some(t) = entry_time(e) else {
            dropped += 1;
            return None;
        };
        let bus_seconds = (t - start).num_seconds();
        let in_window = bus_seconds >= 0 && limit.is_none_or(|l| bus_seconds as f64 <= l);
        in_window.then_some(DonationPoint {
            bus_seconds,
            total: e.total,
        })
    });
    let step = if decimate { DECIMATE_STEP } else { 1 };
    let points: Vec<DonationPoint> = kept.step_by(step).collect();
    if dropped > 0 {
        tracing::warn!(dropped, "donation entries with invalid dates skipped");
    }
    points
}
