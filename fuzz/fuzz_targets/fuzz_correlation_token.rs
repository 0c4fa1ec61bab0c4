//! Fuzz target for check-run correlation tokens.
//!
//! Goal: decoding should **never panic**, and a decoded token re-encodes to a form that
//! decodes to the same value.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_correlation_token
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use repolockr_types::CorrelationToken;

fuzz_target!(|raw: &str| {
    if raw.len() > 512 {
        return;
    }

    if let Ok(token) = CorrelationToken::decode(raw) {
        let again = CorrelationToken::decode(&token.encode());
        assert_eq!(again.as_ref(), Ok(&token));
    }
});
