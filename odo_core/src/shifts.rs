//! Splits a run's donation curve into per-day watch shifts.

use serde::Serialize;

use crate::donations::DonationPoint;
use crate::util::SECS_PER_HOUR;

const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub name: String,
    /// Hour of day the shift begins, inclusive.
    pub start_hour: f64,
    /// Hour of day the shift ends, inclusive.
    pub end_hour: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftPoint {
    /// Seconds since local midnight; the closing point of a midnight shift is 24h.
    pub day_seconds: f64,
    /// Raised since the first point of the segment.
    pub raised: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftSegment {
    /// 1-based day of the run.
    pub day: u32,
    pub shift: String,
    pub points: Vec<ShiftPoint>,
}

/// Cut `points` into one segment per (day, shift) that has data.
/// `start_hour` is the hour of day at which the run began.
pub fn shift_segments(points: &[DonationPoint], start_hour: u32, shifts: &[Shift]) -> Vec<ShiftSegment> {
    let hours: Vec<f64> = points
        .iter()
        .map(|p| p.bus_seconds as f64 / SECS_PER_HOUR + f64::from(start_hour))
        .collect();
    let Some(max_hour) = hours.iter().copied().reduce(f64::max) else {
        return Vec::new();
    };
    let days = (max_hour / HOURS_PER_DAY).floor().max(0.0) as u32 + 1;

    let mut out = Vec::new();
    for day in 0..days {
        let base = f64::from(day) * HOURS_PER_DAY;
        for shift in shifts {
            let (lo, hi) = (base + shift.start_hour, base + shift.end_hour);
            let picked: Vec<(f64, f64)> = hours
                .iter()
                .zip(points)
                .filter(|(h, _)| (lo..=hi).contains(*h))
                .map(|(h, p)| (h.rem_euclid(HOURS_PER_DAY), p.total))
                .collect();
            let Some(&(_, first_total)) = picked.first() else {
                continue;
            };
            let last = picked.len() - 1;
            let segment_points = picked
                .iter()
                .enumerate()
                .map(|(k, &(hod, total))| {
                    let hod = if k == last && hod == 0.0 { HOURS_PER_DAY } else { hod };
                    ShiftPoint {
                        day_seconds: hod * SECS_PER_HOUR,
                        raised: total - first_total,
                    }
                })
                .collect();
            out.push(ShiftSegment {
                day: day + 1,
                shift: shift.name.clone(),
                points: segment_points,
            });
        }
    }
    out
}
