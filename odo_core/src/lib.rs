#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Odometer reconstruction for the bus-marathon telemetry charts.
//!
//! The in-game odometer glitches: it spikes by thousands of miles, rolls back,
//! or reports garbage right after power-on. This crate turns the raw readings
//! into a plausible cumulative mileage curve and resamples it onto a dense
//! one-minute grid for charting.
//!
//! ## Pipeline
//!
//! - **Classify** (`filter`): every interior sample is good or suspect against
//!   its neighbours and the last trusted anchor, bounded by the bus top speed.
//! - **Repair** (`interpolate`): suspects consistent with the last resolved
//!   value are kept; remaining runs are bridged linearly or left unresolved.
//! - **Endpoints** (`boundary`): first and last samples are checked one-sided.
//! - **Resample** (`bucket`): per-minute mean of the resolved values.
//!
//! Around that pure core, `runner` polls the collaborators in `odo_traits`,
//! annotates game events and builds the donation charts.

pub mod bucket;
pub mod conversions;
pub mod donations;
pub mod error;
pub mod events;
pub mod filter;
pub mod interpolate;
pub mod mocks;
pub mod reconstruct;
pub mod runner;
pub mod runs;
pub mod sample;
pub mod shifts;
pub mod util;

mod boundary;

pub use bucket::{Bucket, BucketedSeries};
pub use donations::{DonationPoint, RunSeries, donation_series, run_label};
pub use error::{PipelineError, ReconstructError, Report, Result};
pub use events::{AnnotatedEvent, Event, EventCategory, annotate};
pub use filter::{Classification, SuspectReason, Verdict, classify};
pub use interpolate::RepairStats;
pub use reconstruct::{MIN_SAMPLES, OdometerReconstructor, Reconstruction, reconstruct};
pub use runner::{CycleReport, Pipeline, PipelineSettings, RunSpec};
pub use sample::{ReconstructParams, Sample};
pub use shifts::{Shift, ShiftPoint, ShiftSegment, shift_segments};
