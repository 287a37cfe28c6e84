//! In-memory collaborators for tests and demos.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use odo_traits::{
    ArtifactSink, DonationEntry, DonationFeed, EventRecord, EventSource, OdometerRecord,
    SampleSource, SourceError,
};

/// Sample store backed by a vector; applies the store's filter and ordering.
#[derive(Debug, Clone, Default)]
pub struct VecSamples(pub Vec<OdometerRecord>);

impl SampleSource for VecSamples {
    fn samples_since(&mut self, since: DateTime<Utc>) -> Result<Vec<OdometerRecord>, SourceError> {
        let mut rows: Vec<OdometerRecord> = self
            .0
            .iter()
            .filter(|r| r.miles > 0.0 && r.timestamp > since)
            .copied()
            .collect();
        rows.sort_by_key(|r| r.timestamp);
        Ok(rows)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VecEvents(pub Vec<EventRecord>);

impl EventSource for VecEvents {
    fn events_since(&mut self, since: DateTime<Utc>) -> Result<Vec<EventRecord>, SourceError> {
        let mut rows: Vec<EventRecord> = self
            .0
            .iter()
            .filter(|r| r.timestamp > since)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.timestamp);
        Ok(rows)
    }
}

/// Donation feed keyed by run year; unknown years are an error.
#[derive(Debug, Clone, Default)]
pub struct MapFeed(pub HashMap<u32, Vec<DonationEntry>>);

impl DonationFeed for MapFeed {
    fn fetch(&mut self, year: u32) -> Result<Vec<DonationEntry>, SourceError> {
        self.0
            .get(&year)
            .cloned()
            .ok_or_else(|| format!("no donation feed for year {year}").into())
    }
}

/// A source that always fails; exercises retry paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSource;

impl SampleSource for FailingSource {
    fn samples_since(&mut self, _since: DateTime<Utc>) -> Result<Vec<OdometerRecord>, SourceError> {
        Err(Box::new(std::io::Error::other("store unavailable")))
    }
}

/// Artifact sink that keeps documents in memory. Clones share storage, so a
/// test can keep one handle while the pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    docs: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.docs.lock().ok().and_then(|d| d.get(name).cloned())
    }

    pub fn names(&self) -> Vec<String> {
        self.docs
            .lock()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, name: &str, body: &[u8]) -> Result<(), SourceError> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| std::io::Error::other("sink poisoned"))?;
        docs.insert(name.to_string(), body.to_vec());
        Ok(())
    }
}
