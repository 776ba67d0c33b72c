//! Fuzz target for `package.json` parsing and re-rendering.
//!
//! Goal: neither step should **ever panic**. Errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_manifest_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = pkgguard_repo::fuzz::parse_manifest(text);
        let _ = pkgguard_repo::fuzz::render_manifest(text);
    }
});
