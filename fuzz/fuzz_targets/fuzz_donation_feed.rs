#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = odo_config::tables::parse_donation_feed(data);
});
