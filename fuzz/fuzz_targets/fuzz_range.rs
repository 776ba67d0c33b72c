//! Fuzz target for npm range handling.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_range
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pkgguard_domain::range;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    first: &'a str,
    second: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let _ = range::Range::parse(input.first);
    let normalized = range::normalize(input.first);
    let _ = range::min_version(&normalized);
    let _ = range::exact_from_range(&normalized);
    let _ = range::satisfies(input.second, input.first);
    let _ = range::intersects(input.first, input.second);
});
