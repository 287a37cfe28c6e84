//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

#[derive(Parser, Debug)]
#[command(name = "odo", version, about = "Bus odometer reconstruction and chart feeds")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/odo_config.toml")]
    pub config: PathBuf,

    /// Print results and errors as JSON lines; logs become JSON too
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); defaults to [logging].level or info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconstruct the odometer once and print a summary
    Reconstruct(ReconstructArgs),
    /// Poll the inputs and rewrite the chart artifacts until Ctrl-C
    Watch {
        /// Run a single cycle and exit
        #[arg(long, action = ArgAction::SetTrue)]
        once: bool,
    },
    /// Validate the config and check that the configured inputs are readable
    Check,
}

#[derive(Args, Debug, Default)]
pub struct ReconstructArgs {
    /// Odometer CSV (timestamp,odometer); defaults to sources.samples_csv
    #[arg(long, value_name = "CSV")]
    pub samples: Option<PathBuf>,
    /// Run start; defaults to the current run's start
    #[arg(long, value_name = "TS")]
    pub start: Option<String>,
    /// Write the minute series document here
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Override reconstruction.max_speed_mph
    #[arg(long, value_name = "MPH")]
    pub max_speed_mph: Option<f64>,
}
