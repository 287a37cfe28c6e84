//! Minute-bucket resampling of the corrected series.
//!
//! Buckets sit on a grid anchored at the run start: bucket `k` covers
//! `[start + k min, start + (k+1) min)`. The series is dense, so a timestamp
//! truncated down to its minute always lands on a computed bucket as long as
//! it falls between the start and the last sample.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};

use crate::sample::Sample;
use crate::util::{MILLIS_PER_MINUTE, format_minute, minute_start, minutes_since};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub minute: DateTime<Utc>,
    /// Mean of the resolved samples in the minute; `None` when there were none.
    pub mean_miles: Option<f64>,
}

/// Serialized as `["YYYY-MM-DDTHH:MM:SS", miles | null]`.
impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&format_minute(self.minute))?;
        t.serialize_element(&self.mean_miles)?;
        t.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketedSeries {
    start: DateTime<Utc>,
    buckets: Vec<Bucket>,
}

impl BucketedSeries {
    /// Average resolved values into one bucket per minute from `start` through
    /// the minute holding the last sample's timestamp, capped at `max_buckets`.
    pub fn resample(
        samples: &[Sample],
        corrected: &[Option<f64>],
        start: DateTime<Utc>,
        max_buckets: usize,
    ) -> Self {
        debug_assert_eq!(samples.len(), corrected.len());
        let wanted = samples
            .last()
            .map_or(0, |last| bucket_count(start, last.timestamp));
        let count = wanted.min(max_buckets);
        if wanted > count {
            tracing::warn!(
                wanted,
                kept = count,
                "last sample is past the bucket horizon; series truncated"
            );
        }

        let mut sums = vec![(0.0f64, 0usize); count];
        for (s, c) in samples.iter().zip(corrected) {
            let Some(value) = c else { continue };
            let Some(k) = minutes_since(start, s.timestamp) else {
                continue;
            };
            if let Some(slot) = sums.get_mut(k) {
                slot.0 += value;
                slot.1 += 1;
            }
        }

        // `map_while` stops at the end of the representable calendar.
        let buckets = sums
            .into_iter()
            .enumerate()
            .map_while(|(k, (sum, n))| {
                Some(Bucket {
                    minute: minute_start(start, k)?,
                    mean_miles: (n > 0).then(|| sum / n as f64),
                })
            })
            .collect();

        Self { start, buckets }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    /// Bucket whose minute contains `t`, if `t` is inside the series.
    pub fn bucket_at(&self, t: DateTime<Utc>) -> Option<&Bucket> {
        minutes_since(self.start, t).and_then(|k| self.buckets.get(k))
    }

    /// Mileage of the minute containing `t`; `None` outside the series or for
    /// an absent bucket.
    pub fn miles_at(&self, t: DateTime<Utc>) -> Option<f64> {
        self.bucket_at(t).and_then(|b| b.mean_miles)
    }

    /// Minute start → mean mileage, for callers that want a keyed table.
    pub fn lookup(&self) -> BTreeMap<DateTime<Utc>, Option<f64>> {
        self.buckets.iter().map(|b| (b.minute, b.mean_miles)).collect()
    }

    /// The persisted artifact: a JSON array of `[timestamp, miles|null]`.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl Serialize for BucketedSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.buckets.len()))?;
        for b in &self.buckets {
            seq.serialize_element(b)?;
        }
        seq.end()
    }
}

impl<'a> IntoIterator for &'a BucketedSeries {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// `floor((last - start) / 1 min) + 1`, or zero when `last` precedes `start`.
fn bucket_count(start: DateTime<Utc>, last: DateTime<Utc>) -> usize {
    let ms = (last - start).num_milliseconds();
    if ms < 0 {
        return 0;
    }
    usize::try_from(ms / MILLIS_PER_MINUTE).map_or(0, |k| k + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap()
    }

    fn at(secs: i64, miles: f64) -> Sample {
        Sample::new(t0() + TimeDelta::seconds(secs), miles)
    }

    #[test]
    fn averages_resolved_values_per_minute() {
        let samples = [at(5, 10.0), at(30, 10.2), at(65, 10.5), at(130, 11.0)];
        let corrected = [Some(10.0), Some(10.2), None, Some(11.0)];
        let series = BucketedSeries::resample(&samples, &corrected, t0(), usize::MAX);
        assert_eq!(series.len(), 3);
        assert!((series.buckets()[0].mean_miles.unwrap() - 10.1).abs() < 1e-12);
        // Only an unresolved sample in minute 1: absent, not zero.
        assert_eq!(series.buckets()[1].mean_miles, None);
        assert_eq!(series.buckets()[2].mean_miles, Some(11.0));
        assert_eq!(series.buckets()[2].minute, t0() + TimeDelta::minutes(2));
    }

    #[test]
    fn last_sample_on_a_minute_boundary_gets_its_bucket() {
        let samples = [at(0, 1.0), at(120, 1.2)];
        let series = BucketedSeries::resample(&samples, &[Some(1.0), Some(1.2)], t0(), usize::MAX);
        assert_eq!(series.len(), 3);
        assert_eq!(series.buckets()[2].mean_miles, Some(1.2));
    }

    #[test]
    fn samples_before_start_are_ignored() {
        let start = t0() + TimeDelta::minutes(1);
        let samples = [at(0, 1.0), at(70, 1.1)];
        let series = BucketedSeries::resample(&samples, &[Some(1.0), Some(1.1)], start, usize::MAX);
        assert_eq!(series.len(), 1);
        assert_eq!(series.buckets()[0].mean_miles, Some(1.1));
    }

    #[test]
    fn series_stops_at_max_buckets() {
        let samples = [at(0, 1.0), at(61, 1.1), at(400 * 24 * 3600, 9.0)];
        let series = BucketedSeries::resample(&samples, &[Some(1.0), Some(1.1), Some(9.0)], t0(), 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series.buckets()[1].mean_miles, Some(1.1));
        assert_eq!(series.buckets()[2].mean_miles, None);
    }

    #[test]
    fn lookup_truncates_to_minute() {
        let samples = [at(0, 1.0), at(61, 1.1), at(190, 1.3)];
        let series =
            BucketedSeries::resample(&samples, &[Some(1.0), Some(1.1), Some(1.3)], t0(), usize::MAX);
        assert_eq!(series.miles_at(t0() + TimeDelta::seconds(119)), Some(1.1));
        assert_eq!(series.miles_at(t0() + TimeDelta::minutes(2)), None);
        assert_eq!(series.miles_at(t0() - TimeDelta::seconds(1)), None);
        assert_eq!(series.miles_at(t0() + TimeDelta::minutes(10)), None);
        assert_eq!(series.lookup().len(), series.len());
    }

    #[test]
    fn serializes_as_pairs_with_null() {
        let samples = [at(0, 1.5), at(70, 2.0)];
        let series = BucketedSeries::resample(&samples, &[Some(1.5), None], t0(), usize::MAX);
        let json = String::from_utf8(series.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"[["2023-11-10T18:00:00",1.5],["2023-11-10T18:01:00",null]]"#
        );
    }
}
