//! Mapping of game events onto the bucketed odometer series.

use chrono::{DateTime, Utc};
use odo_traits::EventRecord;
use serde::Serialize;

use crate::bucket::BucketedSeries;
use crate::util::{format_minute, seconds_between};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventCategory {
    GameEvent,
    Crash,
    Other,
}

impl EventCategory {
    /// Map the stored label ("Game Event", "Crash", ...) to a category.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("game event") {
            EventCategory::GameEvent
        } else if label.eq_ignore_ascii_case("crash") {
            EventCategory::Crash
        } else {
            EventCategory::Other
        }
    }

    /// Only game events and crashes are placed on the odometer chart.
    pub fn is_charted(self) -> bool {
        matches!(self, EventCategory::GameEvent | EventCategory::Crash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub category: EventCategory,
    pub description: String,
}

impl From<EventRecord> for Event {
    fn from(r: EventRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            category: EventCategory::from_label(&r.category),
            description: r.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedEvent {
    pub timestamp: String,
    /// Seconds since the run start.
    pub bus_seconds: f64,
    pub category: EventCategory,
    pub description: String,
    /// Mileage of the minute the event falls in; `None` when that bucket is
    /// absent or the event is outside the series.
    pub miles: Option<f64>,
}

/// Annotate charted events after the series start with their mileage.
pub fn annotate(events: &[Event], series: &BucketedSeries) -> Vec<AnnotatedEvent> {
    let start = series.start();
    events
        .iter()
        .filter(|e| e.category.is_charted() && e.timestamp > start)
        .map(|e| AnnotatedEvent {
            timestamp: format_minute(e.timestamp),
            bus_seconds: seconds_between(start, e.timestamp),
            category: e.category,
            description: e.description.clone(),
            miles: series.miles_at(e.timestamp),
        })
        .collect()
}
