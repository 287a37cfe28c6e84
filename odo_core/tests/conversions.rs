use std::time::Duration;

use chrono::{TimeZone, Utc};
use odo_core::{PipelineSettings, ReconstructParams};

const CONFIG: &str = r#"
label = "DBfH"

[reconstruction]
max_speed_mph = 36.0
startup_noise_miles = 500.0

[poll]
interval_s = 30

[sources]
samples_csv = "bus_data.csv"

[[runs]]
year = 17
start = "2023-11-10 18:00:00"

[[runs]]
year = 16
start = "2022-11-11T18:00:00Z"
end_hour = 156.0
"#;

#[test]
fn settings_follow_the_config() {
    let cfg = odo_config::load_toml(CONFIG).unwrap();
    cfg.validate().unwrap();
    let s = PipelineSettings::try_from(&cfg).unwrap();

    assert_eq!(s.current.year, 17);
    assert_eq!(s.current.start, Utc.with_ymd_and_hms(2023, 11, 10, 18, 0, 0).unwrap());
    assert_eq!(s.previous.len(), 1);
    assert_eq!(s.previous[0].end_hour, Some(156.0));
    assert_eq!(s.interval, Duration::from_secs(30));
    assert_eq!(s.shifts.len(), 4);
    assert!((s.params.max_speed - 0.01).abs() < 1e-12);
    assert_eq!(s.params.startup_noise_miles, 500.0);
    assert_eq!(s.odometer_artifact(), "DBfH_17_odometer.json");
}

#[test]
fn default_reconstruction_matches_core_defaults() {
    let params = ReconstructParams::from(&odo_config::ReconstructionCfg::default());
    assert_eq!(params, ReconstructParams::default());
}
