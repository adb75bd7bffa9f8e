//! Fuzz target for range specifications and value comparison.

#![no_main]

use arbitrary::Arbitrary;
use csvprofiler::schema::{RangeSpec, parse_date};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    spec: String,
    value: String,
}

fuzz_target!(|input: Input| {
    let _ = parse_date(&input.value);
    if let Ok(spec) = RangeSpec::parse(&input.spec) {
        let _ = spec.contains(&input.value);
        assert_eq!(spec.to_string(), input.spec.trim());
    }
});
