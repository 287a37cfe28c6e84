#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and input table parsing for the odometer pipeline.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - CSV loaders enforce exact headers; timestamps accept RFC 3339 and the
//!   naive database layouts.
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;

pub mod tables;
pub mod timestamp;

pub use tables::{
    EventRow, FeedRow, SampleRow, load_donation_feed, load_events_csv, load_samples_csv,
    parse_donation_feed,
};
pub use timestamp::parse_timestamp;

use timestamp::de_timestamp;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReconstructionCfg {
    /// Nominal top speed of the vehicle; odometer progress faster than this is implausible.
    pub max_speed_mph: f64,
    /// Readings above this before the first trusted sample are treated as power-on noise.
    pub startup_noise_miles: f64,
    /// Minute buckets stop this many hours after the run start.
    pub max_span_hours: u32,
}

impl Default for ReconstructionCfg {
    fn default() -> Self {
        Self {
            max_speed_mph: 45.0,
            startup_noise_miles: 1000.0,
            max_span_hours: 14 * 24,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollCfg {
    /// Seconds between polling cycles
    pub interval_s: u64,
    /// Previous runs with `year >= decimate_previous_from` are thinned to every fifth point
    pub decimate_previous_from: u32,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self {
            interval_s: 60,
            decimate_previous_from: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    pub dir: PathBuf,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesCfg {
    /// Odometer export (`timestamp,odometer`)
    pub samples_csv: PathBuf,
    /// Optional event export (`timestamp,category,description`)
    #[serde(default)]
    pub events_csv: Option<PathBuf>,
    /// Optional donation feed path template; `{year}` is substituted
    #[serde(default)]
    pub donations: Option<String>,
}

impl SourcesCfg {
    pub fn donations_path(&self, year: u32) -> Option<PathBuf> {
        self.donations
            .as_ref()
            .map(|t| PathBuf::from(t.replace("{year}", &year.to_string())))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// One marathon run. The run without `end_hour` is the one in progress.
#[derive(Debug, Deserialize, Clone)]
pub struct RunCfg {
    pub year: u32,
    #[serde(deserialize_with = "de_timestamp")]
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end_hour: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShiftCfg {
    pub name: String,
    pub start_hour: f64,
    pub end_hour: f64,
}

fn default_label() -> String {
    "DBfH".to_string()
}

fn default_shifts() -> Vec<ShiftCfg> {
    [
        ("Zeta Shift", 0.0, 6.0),
        ("Dawn Guard", 6.0, 12.0),
        ("Alpha Flight", 12.0, 18.0),
        ("Night Watch", 18.0, 24.0),
    ]
    .into_iter()
    .map(|(name, start_hour, end_hour)| ShiftCfg {
        name: name.to_string(),
        start_hour,
        end_hour,
    })
    .collect()
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Prefix for artifact names and chart titles
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub reconstruction: ReconstructionCfg,
    #[serde(default)]
    pub poll: PollCfg,
    #[serde(default)]
    pub output: OutputCfg,
    pub sources: SourcesCfg,
    #[serde(default)]
    pub logging: Logging,
    pub runs: Vec<RunCfg>,
    #[serde(default = "default_shifts")]
    pub shifts: Vec<ShiftCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// The run still in progress (no `end_hour`).
    pub fn current_run(&self) -> Option<&RunCfg> {
        self.runs.iter().find(|r| r.end_hour.is_none())
    }

    /// Finished runs, in config order.
    pub fn previous_runs(&self) -> impl Iterator<Item = &RunCfg> {
        self.runs.iter().filter(|r| r.end_hour.is_some())
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if self.label.trim().is_empty() {
            eyre::bail!("label must not be empty");
        }

        // Reconstruction
        let r = &self.reconstruction;
        if !(r.max_speed_mph.is_finite() && r.max_speed_mph > 0.0) {
            eyre::bail!("reconstruction.max_speed_mph must be > 0");
        }
        if r.max_speed_mph > 1000.0 {
            eyre::bail!("reconstruction.max_speed_mph is unreasonably large (>1000)");
        }
        if !(r.startup_noise_miles.is_finite() && r.startup_noise_miles >= 0.0) {
            eyre::bail!("reconstruction.startup_noise_miles must be >= 0");
        }
        if r.max_span_hours == 0 {
            eyre::bail!("reconstruction.max_span_hours must be >= 1");
        }
        if r.max_span_hours > 366 * 24 {
            eyre::bail!("reconstruction.max_span_hours is unreasonably large (>1 year)");
        }

        // Poll
        if self.poll.interval_s == 0 {
            eyre::bail!("poll.interval_s must be >= 1");
        }
        if self.poll.interval_s > 24 * 60 * 60 {
            eyre::bail!("poll.interval_s is unreasonably large (>24h)");
        }

        // Sources
        if let Some(t) = &self.sources.donations
            && !t.contains("{year}")
        {
            eyre::bail!("sources.donations must contain a {{year}} placeholder");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        // Runs
        let current = self.runs.iter().filter(|r| r.end_hour.is_none()).count();
        if current != 1 {
            eyre::bail!("runs must contain exactly one run without end_hour, found {current}");
        }
        for (i, run) in self.runs.iter().enumerate() {
            if let Some(h) = run.end_hour
                && !(h.is_finite() && h > 0.0)
            {
                eyre::bail!("runs[{i}].end_hour must be > 0");
            }
            if self.runs[..i].iter().any(|o| o.year == run.year) {
                eyre::bail!("runs[{i}].year {} is duplicated", run.year);
            }
        }

        // Shifts
        for (i, s) in self.shifts.iter().enumerate() {
            if !(0.0..=24.0).contains(&s.start_hour) || !(0.0..=24.0).contains(&s.end_hour) {
                eyre::bail!("shifts[{i}] hours must be within [0, 24]");
            }
            if s.start_hour >= s.end_hour {
                eyre::bail!("shifts[{i}].start_hour must be < end_hour");
            }
        }

        Ok(())
    }
}
