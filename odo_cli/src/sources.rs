//! File-backed collaborators: CSV exports, the donation feed, and the output
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use odo_config::{EventRow, FeedRow, SampleRow};
use odo_traits::{
    ArtifactSink, DonationEntry, DonationFeed, EventRecord, EventSource, OdometerRecord,
    SampleSource, SourceError,
};

fn boxed(e: &eyre::Report) -> SourceError {
    format!("{e:#}").into()
}

/// Odometer export re-read on every call, so appended rows are picked up.
pub struct CsvSamples {
    path: PathBuf,
}

impl CsvSamples {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for CsvSamples {
    fn samples_since(&mut self, since: DateTime<Utc>) -> Result<Vec<OdometerRecord>, SourceError> {
        let rows = odo_config::load_samples_csv(&self.path).map_err(|e| boxed(&e))?;
        Ok(samples_after(rows, since))
    }
}

/// Rows with positive mileage strictly after `since`, in timestamp order.
/// Rows sharing a timestamp keep their file order.
pub fn samples_after(rows: Vec<SampleRow>, since: DateTime<Utc>) -> Vec<OdometerRecord> {
    let mut out: Vec<OdometerRecord> = rows
        .into_iter()
        .filter(|r| r.odometer > 0.0 && r.timestamp > since)
        .map(|r| OdometerRecord {
            timestamp: r.timestamp,
            miles: r.odometer,
        })
        .collect();
    out.sort_by_key(|r| r.timestamp);
    out
}

pub struct CsvEvents {
    path: PathBuf,
}

impl CsvEvents {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for CsvEvents {
    fn events_since(&mut self, since: DateTime<Utc>) -> Result<Vec<EventRecord>, SourceError> {
        let rows = odo_config::load_events_csv(&self.path).map_err(|e| boxed(&e))?;
        let mut out: Vec<EventRecord> = rows
            .into_iter()
            .filter(|r| r.timestamp > since)
            .map(|r: EventRow| EventRecord {
                timestamp: r.timestamp,
                category: r.category,
                description: r.description,
            })
            .collect();
        out.sort_by_key(|r| r.timestamp);
        Ok(out)
    }
}

/// Donation feed documents on disk, one per run year.
pub struct FileFeed {
    template: String,
}

impl FileFeed {
    /// `template` must contain `{year}`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    fn path(&self, year: u32) -> PathBuf {
        PathBuf::from(self.template.replace("{year}", &year.to_string()))
    }
}

impl DonationFeed for FileFeed {
    fn fetch(&mut self, year: u32) -> Result<Vec<DonationEntry>, SourceError> {
        let rows = odo_config::load_donation_feed(&self.path(year)).map_err(|e| boxed(&e))?;
        Ok(rows.into_iter().map(entry).collect())
    }
}

fn entry(FeedRow(year, month, day, hour, minute, total): FeedRow) -> DonationEntry {
    DonationEntry {
        year,
        month,
        day,
        hour,
        minute,
        total,
    }
}

/// Writes artifacts into a directory. Each document is written to a hidden
/// temp file first and renamed into place, so readers never see a partial file.
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn create(dir: impl Into<PathBuf>) -> eyre::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| eyre::eyre!("create output dir {:?}: {}", dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirSink {
    fn write(&mut self, name: &str, body: &[u8]) -> Result<(), SourceError> {
        write_atomic(&self.dir.join(name), body)?;
        Ok(())
    }
}

pub fn write_atomic(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(h: u32, m: u32, miles: f64) -> SampleRow {
        SampleRow {
            timestamp: Utc.with_ymd_and_hms(2023, 11, 10, h, m, 0).unwrap(),
            odometer: miles,
        }
    }

    #[test]
    fn store_filter_drops_zero_and_early_rows() {
        let since = Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap();
        let rows = vec![
            row(18, 5, 2.0),
            row(17, 59, 1.0),
            row(18, 0, 1.5),
            row(18, 2, 0.0),
            row(18, 1, 1.8),
        ];
        let miles: Vec<f64> = samples_after(rows, since).iter().map(|r| r.miles).collect();
        assert_eq!(miles, vec![1.8, 2.0]);
    }

    #[test]
    fn equal_timestamps_keep_file_order() {
        let since = Utc.with_ymd_and_hms(2023, 11, 10, 0, 0, 0).unwrap();
        let rows = vec![row(18, 1, 3.0), row(18, 0, 1.0), row(18, 1, 2.0)];
        let miles: Vec<f64> = samples_after(rows, since).iter().map(|r| r.miles).collect();
        assert_eq!(miles, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn dir_sink_replaces_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirSink::create(dir.path().join("out")).unwrap();
        sink.write("a.json", b"[1]").unwrap();
        sink.write("a.json", b"[2]").unwrap();
        let body = fs::read(sink.dir().join("a.json")).unwrap();
        assert_eq!(body, b"[2]");
        assert!(!sink.dir().join(".a.json.tmp").exists());
    }

    #[test]
    fn feed_template_substitutes_year() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("17.json"), "[[2023,11,10,18,5,120.5]]").unwrap();
        let template = format!("{}/{{year}}.json", dir.path().display());
        let mut feed = FileFeed::new(template);
        let entries = feed.fetch(17).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].minute, 5);
        assert!(feed.fetch(16).is_err());
    }
}
