//! `From` implementations bridging `odo_config` types to `odo_core` types.

use std::time::Duration;

use crate::runner::{PipelineSettings, RunSpec};
use crate::sample::ReconstructParams;
use crate::shifts::Shift;
use crate::util::mph_to_miles_per_sec;

// ── ReconstructParams ────────────────────────────────────────────────────────

impl From<&odo_config::ReconstructionCfg> for ReconstructParams {
    fn from(c: &odo_config::ReconstructionCfg) -> Self {
        Self {
            max_speed: mph_to_miles_per_sec(c.max_speed_mph),
            startup_noise_miles: c.startup_noise_miles,
            max_span_minutes: usize::try_from(c.max_span_hours)
                .map_or(usize::MAX, |h| h.saturating_mul(60)),
        }
    }
}

// ── Runs and shifts ──────────────────────────────────────────────────────────

impl From<&odo_config::RunCfg> for RunSpec {
    fn from(c: &odo_config::RunCfg) -> Self {
        Self {
            year: c.year,
            start: c.start,
            end_hour: c.end_hour,
        }
    }
}

impl From<&odo_config::ShiftCfg> for Shift {
    fn from(c: &odo_config::ShiftCfg) -> Self {
        Self {
            name: c.name.clone(),
            start_hour: c.start_hour,
            end_hour: c.end_hour,
        }
    }
}

// ── PipelineSettings ─────────────────────────────────────────────────────────

impl TryFrom<&odo_config::Config> for PipelineSettings {
    type Error = eyre::Report;

    fn try_from(c: &odo_config::Config) -> Result<Self, Self::Error> {
        let current = c
            .current_run()
            .ok_or_else(|| eyre::eyre!("config has no current run (a run without end_hour)"))?;
        Ok(Self {
            label: c.label.clone(),
            current: current.into(),
            previous: c.previous_runs().map(RunSpec::from).collect(),
            params: (&c.reconstruction).into(),
            interval: Duration::from_secs(c.poll.interval_s),
            shifts: c.shifts.iter().map(Shift::from).collect(),
            decimate_previous_from: c.poll.decimate_previous_from,
        })
    }
}
