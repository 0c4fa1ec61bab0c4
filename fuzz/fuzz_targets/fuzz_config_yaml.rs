//! Fuzz target for `.github/repolockr.yml` parsing and resolution.
//!
//! Goal: parsing should **never panic** on any input, and anything that parses must resolve
//! and evaluate cleanly.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_yaml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(cfg) = repolockr_settings::parse_config_yaml(text) else {
        return;
    };

    let policy = repolockr_settings::resolve_config(cfg);
    let changed: Vec<String> = policy.lock.iter().take(4).cloned().collect();
    let verdict = repolockr_domain::evaluate(&policy, &changed);
    assert_eq!(verdict.violating_files.len(), changed.len());
});
