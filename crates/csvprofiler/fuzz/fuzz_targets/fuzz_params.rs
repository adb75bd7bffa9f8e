//! Fuzz target for the param file parser.
//!
//! Parsing arbitrary bytes must return a column set or an error, never panic.

#![no_main]

use csvprofiler::schema::parse_params;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    if let Ok(columns) = parse_params(data) {
        // Anything that parses has unique, non-blank names.
        let names = columns.names();
        assert!(names.iter().all(|n| !n.is_empty()));
    }
});
