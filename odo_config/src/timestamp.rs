//! Timestamp text formats accepted from config files, CSV exports and the feed.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::Deserializer;

/// Naive layouts, read as UTC. `%.f` also matches an absent fraction.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Database exports with a numeric offset, e.g. `2023-11-10 18:00:00+00`.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Parse an instant from RFC 3339, an offset-suffixed database timestamp, or a
/// naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` value (interpreted as UTC).
pub fn parse_timestamp(s: &str) -> eyre::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    eyre::bail!("unrecognized timestamp {s:?} (expected RFC 3339 or YYYY-MM-DD HH:MM:SS)")
}

pub(crate) fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn accepts_all_layouts() {
        let want = Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap();
        for s in [
            "2023-11-10T18:00:00",
            "2023-11-10 18:00:00",
            "2023-11-10T18:00:00Z",
            "2023-11-10T20:00:00+02:00",
            "2023-11-10 18:00:00+00",
            " 2023-11-10T18:00:00.000 ",
        ] {
            assert_eq!(parse_timestamp(s).unwrap(), want, "{s}");
        }
    }

    #[test]
    fn keeps_fraction() {
        let t = parse_timestamp("2023-11-10 18:00:00.250").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.to_string().contains("unrecognized timestamp"));
    }
}
