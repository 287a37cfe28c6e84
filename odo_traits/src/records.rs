use chrono::{DateTime, Utc};

/// One raw odometer row as stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdometerRecord {
    pub timestamp: DateTime<Utc>,
    pub miles: f64,
}

/// One event log row. `category` is the stored free-text label
/// ("Game Event", "Crash", ...).
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub description: String,
}

/// Feed row: `[year, month, day, hour, minute, total]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationEntry {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub total: f64,
}
