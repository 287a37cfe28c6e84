//! Collaborator seams for the odometer pipeline.
//!
//! Storage, the donation feed and artifact output live outside the core. The
//! core only sees these traits and the plain records they exchange.
pub mod records;

pub use records::{DonationEntry, EventRecord, OdometerRecord};

use chrono::{DateTime, Utc};

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Odometer telemetry store.
pub trait SampleSource {
    /// Rows with `miles > 0` and `timestamp > since`, ascending by timestamp.
    fn samples_since(&mut self, since: DateTime<Utc>) -> Result<Vec<OdometerRecord>, SourceError>;
}

/// Game event log for a run window.
pub trait EventSource {
    /// Rows with `timestamp > since`, ascending by timestamp.
    fn events_since(&mut self, since: DateTime<Utc>) -> Result<Vec<EventRecord>, SourceError>;
}

/// Per-year donation totals feed.
pub trait DonationFeed {
    fn fetch(&mut self, year: u32) -> Result<Vec<DonationEntry>, SourceError>;
}

/// Destination for named JSON documents (one per artifact).
pub trait ArtifactSink {
    fn write(&mut self, name: &str, body: &[u8]) -> Result<(), SourceError>;
}
