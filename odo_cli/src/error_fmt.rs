//! Human-readable error descriptions and structured JSON error formatting.

use odo_core::error::{PipelineError, ReconstructError};

use crate::config::ConfigInvalid;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(re) = err.downcast_ref::<ReconstructError>() {
        return match re {
            ReconstructError::InsufficientData { got, needed } => format!(
                "What happened: Only {got} odometer samples after the run start; at least {needed} are needed.\nLikely causes: The run has only just started, the export is empty, or --start is later than the data.\nHow to fix: Wait for more samples or check the run start in [[runs]] / --start."
            ),
            ReconstructError::InvalidParameter(what) => format!(
                "What happened: Invalid reconstruction parameter ({what}).\nLikely causes: --max-speed-mph or [reconstruction] is zero, negative, or not a number.\nHow to fix: Use a positive top speed (45 mph is typical)."
            ),
        };
    }

    if let Some(ci) = err.downcast_ref::<ConfigInvalid>() {
        return format!(
            "What happened: The configuration {:?} is not usable ({}).\nLikely causes: Missing file, TOML syntax error, or out-of-range values.\nHow to fix: Edit the config file, then run `odo check`.",
            ci.path, ci.message
        );
    }

    if let Some(pe) = err.downcast_ref::<PipelineError>() {
        return match pe {
            PipelineError::Source(msg) => format!(
                "What happened: Could not read odometer samples ({msg}).\nLikely causes: sources.samples_csv is missing or malformed.\nHow to fix: Check the export path and its 'timestamp,odometer' header."
            ),
            PipelineError::Feed(msg) => format!(
                "What happened: Could not read the donation feed ({msg}).\nLikely causes: No feed document for that run year.\nHow to fix: Check sources.donations and the files it points at."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from input tables
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("must have headers") {
        return format!("Invalid headers in CSV input. {msg}");
    }

    if lower.contains("unrecognized timestamp") {
        return format!(
            "What happened: {msg}.\nHow to fix: Use RFC 3339 (2023-11-10T18:00:00Z) or 'YYYY-MM-DD HH:MM:SS'."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

pub const EXIT_INSUFFICIENT_DATA: i32 = 3;
pub const EXIT_CONFIG_INVALID: i32 = 4;

/// Stable exit codes: 3 insufficient data, 4 invalid config or parameter, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<ReconstructError>() {
        Some(ReconstructError::InsufficientData { .. }) => return EXIT_INSUFFICIENT_DATA,
        Some(ReconstructError::InvalidParameter(_)) => return EXIT_CONFIG_INVALID,
        None => {}
    }
    if err.downcast_ref::<ConfigInvalid>().is_some() {
        return EXIT_CONFIG_INVALID;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(re) = err.downcast_ref::<ReconstructError>() {
        return match re {
            ReconstructError::InsufficientData { .. } => "InsufficientData",
            ReconstructError::InvalidParameter(_) => "InvalidParameter",
        };
    }
    if err.downcast_ref::<ConfigInvalid>().is_some() {
        return "ConfigInvalid";
    }
    if let Some(pe) = err.downcast_ref::<PipelineError>() {
        return match pe {
            PipelineError::Source(_) => "Source",
            PipelineError::Events(_) => "Events",
            PipelineError::Feed(_) => "Feed",
            PipelineError::Sink(_) => "Sink",
            PipelineError::Serialize { .. } => "Serialize",
        };
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = reason_name(err);
    let msg = humanize(err);
    match err.downcast_ref::<ReconstructError>() {
        Some(ReconstructError::InsufficientData { got, needed }) => json!({
            "reason": reason,
            "details": { "got": got, "needed": needed },
            "message": msg,
        }),
        _ => json!({ "reason": reason, "message": msg }),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_maps_to_three() {
        let err = eyre::Report::new(ReconstructError::InsufficientData { got: 2, needed: 3 });
        assert_eq!(exit_code_for_error(&err), 3);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "InsufficientData");
        assert_eq!(v["details"]["got"], 2);
    }

    #[test]
    fn config_errors_map_to_four() {
        let err = eyre::Report::new(ConfigInvalid::new(std::path::Path::new("x.toml"), "bad"));
        assert_eq!(exit_code_for_error(&err), 4);
        assert!(humanize(&err).contains("odo check"));
    }

    #[test]
    fn other_errors_map_to_one() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(format_error_json(&err).contains("\"reason\":\"Error\""));
    }
}
