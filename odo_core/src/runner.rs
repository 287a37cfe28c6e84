//! Polling pipeline: one cycle reads the collaborators, reconstructs, and
//! writes the chart artifacts. The loop repeats until shut down and survives
//! failed cycles.

use std::time::{Duration, Instant};

use chrono::{DateTime, Timelike, Utc};
use crossbeam_channel as xch;
use odo_traits::{ArtifactSink, DonationFeed, EventSource, SampleSource};
use serde::Serialize;

use crate::donations::{RunSeries, donation_series, run_label};
use crate::error::{PipelineError, ReconstructError, Result};
use crate::events::{Event, annotate};
use crate::reconstruct::reconstruct;
use crate::sample::{ReconstructParams, Sample};
use crate::shifts::{Shift, shift_segments};

/// One marathon run as the pipeline sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSpec {
    pub year: u32,
    pub start: DateTime<Utc>,
    /// Set for finished runs only.
    pub end_hour: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub label: String,
    pub current: RunSpec,
    pub previous: Vec<RunSpec>,
    pub params: ReconstructParams,
    pub interval: Duration,
    pub shifts: Vec<Shift>,
    /// Finished runs from this year on are thinned.
    pub decimate_previous_from: u32,
}

impl PipelineSettings {
    pub fn odometer_artifact(&self) -> String {
        format!("{}_{}_odometer.json", self.label, self.current.year)
    }

    pub fn events_artifact(&self) -> String {
        format!("{}_{}_events.json", self.label, self.current.year)
    }

    pub fn shifts_artifact(&self) -> String {
        format!("{}_{}_shifts.json", self.label, self.current.year)
    }

    pub fn all_years_artifact(&self) -> &'static str {
        "all_years_donations.json"
    }
}

/// What one cycle produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub donation_points: usize,
    pub samples: usize,
    pub buckets: usize,
    pub events: usize,
    /// Too few samples to reconstruct this cycle.
    pub odometer_skipped: bool,
    pub artifacts: Vec<String>,
}

type BoxedEvents = Box<dyn EventSource + Send>;
type BoxedFeed = Box<dyn DonationFeed + Send>;

pub struct Pipeline<S, K> {
    samples: S,
    sink: K,
    events: Option<BoxedEvents>,
    donations: Option<BoxedFeed>,
    settings: PipelineSettings,
    history: Vec<RunSeries>,
}

impl<S, K> Pipeline<S, K>
where
    S: SampleSource,
    K: ArtifactSink,
{
    pub fn new(samples: S, sink: K, settings: PipelineSettings) -> Self {
        Self {
            samples,
            sink,
            events: None,
            donations: None,
            settings,
            history: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: BoxedEvents) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_donations(mut self, feed: BoxedFeed) -> Self {
        self.donations = Some(feed);
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn history(&self) -> &[RunSeries] {
        &self.history
    }

    /// Fetch the finished runs once. A no-op without a donation feed.
    pub fn load_history(&mut self) -> Result<()> {
        let Some(feed) = self.donations.as_mut() else {
            return Ok(());
        };
        let mut history = Vec::with_capacity(self.settings.previous.len());
        for run in &self.settings.previous {
            tracing::info!(year = run.year, "loading previous donations");
            let entries = feed
                .fetch(run.year)
                .map_err(|e| PipelineError::Feed(e.to_string()))?;
            let decimate = run.year >= self.settings.decimate_previous_from;
            history.push(RunSeries {
                year: run.year,
                label: run_label(&self.settings.label, run.year),
                current: false,
                points: donation_series(&entries, run.start, run.end_hour, decimate),
            });
        }
        self.history = history;
        Ok(())
    }

    /// One polling cycle. Errors abort the cycle; the caller decides to retry.
    pub fn cycle(&mut self) -> Result<CycleReport> {
        let mut report = CycleReport::default();
        let current = self.settings.current.clone();

        if self.donations.is_some() {
            self.donation_artifacts(&current, &mut report)?;
        }

        let records = self
            .samples
            .samples_since(current.start)
            .map_err(|e| PipelineError::Source(e.to_string()))?;
        let samples: Vec<Sample> = records.into_iter().map(Sample::from).collect();
        report.samples = samples.len();

        match reconstruct(&samples, current.start, &self.settings.params) {
            Ok(rec) => {
                report.buckets = rec.buckets.len();
                let name = self.settings.odometer_artifact();
                let body = rec
                    .buckets
                    .to_json()
                    .map_err(|e| serialize_error(&name, &e))?;
                self.emit(&name, &body, &mut report)?;

                if let Some(source) = self.events.as_mut() {
                    let events: Vec<Event> = source
                        .events_since(current.start)
                        .map_err(|e| PipelineError::Events(e.to_string()))?
                        .into_iter()
                        .map(Event::from)
                        .collect();
                    let annotated = annotate(&events, &rec.buckets);
                    report.events = annotated.len();
                    let name = self.settings.events_artifact();
                    let body = to_json(&name, &annotated)?;
                    self.emit(&name, &body, &mut report)?;
                }
            }
            Err(ReconstructError::InsufficientData { got, needed }) => {
                tracing::warn!(got, needed, "not enough odometer samples yet; skipping");
                report.odometer_skipped = true;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(report)
    }

    fn donation_artifacts(&mut self, current: &RunSpec, report: &mut CycleReport) -> Result<()> {
        let Some(feed) = self.donations.as_mut() else {
            return Ok(());
        };
        let entries = feed
            .fetch(current.year)
            .map_err(|e| PipelineError::Feed(e.to_string()))?;
        let points = donation_series(&entries, current.start, None, false);
        report.donation_points = points.len();

        let segments = shift_segments(&points, current.start.hour(), &self.settings.shifts);

        let mut all_years = self.history.clone();
        all_years.push(RunSeries {
            year: current.year,
            label: run_label(&self.settings.label, current.year),
            current: true,
            points,
        });

        let name = self.settings.all_years_artifact().to_string();
        let body = to_json(&name, &all_years)?;
        self.emit(&name, &body, report)?;

        let name = self.settings.shifts_artifact();
        let body = to_json(&name, &segments)?;
        self.emit(&name, &body, report)
    }

    fn emit(&mut self, name: &str, body: &[u8], report: &mut CycleReport) -> Result<()> {
        self.sink
            .write(name, body)
            .map_err(|e| PipelineError::Sink(format!("{name}: {e}")))?;
        tracing::debug!(artifact = name, bytes = body.len(), "artifact written");
        report.artifacts.push(name.to_string());
        Ok(())
    }

    /// Run cycles every `settings.interval` until `shutdown` fires or its
    /// sender is dropped. Failed cycles are logged and retried on the next
    /// tick. Returns the number of cycles attempted.
    pub fn run(&mut self, shutdown: &xch::Receiver<()>) -> usize {
        let mut cycles = 0usize;
        loop {
            if shutdown.try_recv().is_ok() {
                break;
            }
            cycles += 1;
            let t_start = Instant::now();
            match self.cycle() {
                Ok(r) => tracing::info!(
                    cycle = cycles,
                    samples = r.samples,
                    buckets = r.buckets,
                    events = r.events,
                    donation_points = r.donation_points,
                    elapsed_ms = t_start.elapsed().as_millis() as u64,
                    "cycle complete"
                ),
                Err(e) => tracing::error!(cycle = cycles, error = %e, "cycle failed; retrying"),
            }
            let stop = xch::select! {
                recv(shutdown) -> _ => true,
                default(self.settings.interval) => false,
            };
            if stop {
                break;
            }
        }
        tracing::info!(cycles, "pipeline stopped");
        cycles
    }
}

fn to_json<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| serialize_error(name, &e).into())
}

fn serialize_error(name: &str, e: &serde_json::Error) -> PipelineError {
    PipelineError::Serialize {
        name: name.to_string(),
        message: e.to_string(),
    }
}
