//! Strict-header CSV exports and the donation feed document.
//!
//! Samples CSV:
//! timestamp,odometer
//! 2023-11-10 18:00:05,1204.3
//!
//! Events CSV:
//! timestamp,category,description
//! 2023-11-10 19:12:00,Game Event,Bus stop
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::timestamp::de_timestamp;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SampleRow {
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub odometer: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventRow {
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Feed row `[year, month, day, hour, minute, total]`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct FeedRow(pub i32, pub u32, pub u32, pub u32, pub u32, pub f64);

pub fn load_samples_csv(path: &Path) -> eyre::Result<Vec<SampleRow>> {
    read_strict(path, &["timestamp", "odometer"])
}

pub fn load_events_csv(path: &Path) -> eyre::Result<Vec<EventRow>> {
    read_strict(path, &["timestamp", "category", "description"])
}

fn read_strict<T: DeserializeOwned>(path: &Path, expected: &[&str]) -> eyre::Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<&str> = headers.iter().collect();
    if actual != expected {
        eyre::bail!(
            "CSV {:?} must have headers '{}', got: {}",
            path,
            expected.join(","),
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<T>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => eyre::bail!("invalid CSV row {} in {:?}: {}", idx + 2, path, e),
        }
    }
    Ok(rows)
}

pub fn parse_donation_feed(text: &str) -> eyre::Result<Vec<FeedRow>> {
    serde_json::from_str(text).map_err(|e| eyre::eyre!("invalid donation feed: {e}"))
}

pub fn load_donation_feed(path: &Path) -> eyre::Result<Vec<FeedRow>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read donation feed {:?}: {}", path, e))?;
    parse_donation_feed(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_rows_are_positional() {
        let rows = parse_donation_feed("[[2023,11,10,18,0,0.0],[2023,11,10,18,1,25.5]]").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], FeedRow(2023, 11, 10, 18, 1, 25.5));
    }

    #[test]
    fn feed_rejects_short_rows() {
        assert!(parse_donation_feed("[[2023,11,10,18]]").is_err());
    }
}
