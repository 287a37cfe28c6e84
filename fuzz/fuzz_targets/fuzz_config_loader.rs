#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are both fine; panics are not.
    if let Ok(cfg) = odo_config::load_toml(data) {
        if cfg.validate().is_ok() {
            let _ = cfg.current_run();
            let _ = cfg.sources.donations_path(17);
        }
    }
});
