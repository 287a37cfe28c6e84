//! Common time/unit helpers for odo_core.

use chrono::{DateTime, TimeDelta, Utc};

/// Number of seconds in one hour.
pub const SECS_PER_HOUR: f64 = 3600.0;
/// Number of milliseconds in one minute.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Convert a speed in miles per hour to miles per second.
#[inline]
pub fn mph_to_miles_per_sec(mph: f64) -> f64 {
    mph / SECS_PER_HOUR
}

/// Signed seconds from `from` to `to`, at millisecond resolution.
#[inline]
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Whole minutes from `start` to `t`, or `None` when `t` precedes `start`.
#[inline]
pub fn minutes_since(start: DateTime<Utc>, t: DateTime<Utc>) -> Option<usize> {
    let ms = (t - start).num_milliseconds();
    if ms < 0 {
        return None;
    }
    usize::try_from(ms / MILLIS_PER_MINUTE).ok()
}

/// Start of the `k`-th minute on the grid anchored at `start`, or `None` past
/// the end of the calendar.
#[inline]
pub fn minute_start(start: DateTime<Utc>, k: usize) -> Option<DateTime<Utc>> {
    let delta = TimeDelta::try_minutes(i64::try_from(k).ok()?)?;
    start.checked_add_signed(delta)
}

/// `YYYY-MM-DDTHH:MM:SS`, fractional seconds dropped.
pub fn format_minute(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}
