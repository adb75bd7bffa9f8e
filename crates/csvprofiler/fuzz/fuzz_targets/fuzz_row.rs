//! Fuzz target for reading and evaluating arbitrary CSV input.
//!
//! The input is written to a temp file and run through a fixed column set,
//! exercising delimiter detection, lossy decoding and every check family.

#![no_main]

use std::io::Write;

use csvprofiler::input::{CsvRowSupplier, Dialect};
use csvprofiler::registry::{CustomRegistry, InMemoryResources};
use csvprofiler::reporter::MemorySink;
use csvprofiler::schema::{ColumnDefinition, ColumnSet, NamedTest, RangeSpec, TestKind};
use csvprofiler::{Engine, EngineOptions};
use libfuzzer_sys::fuzz_target;

fn columns() -> ColumnSet {
    ColumnSet::new(vec![
        ColumnDefinition::new("a", 0).with_test(TestKind::Digit).with_strip(true),
        ColumnDefinition::new("b", 1).with_test(TestKind::Named {
            test: NamedTest::Email,
        }),
        ColumnDefinition::new("c", 2).with_test(TestKind::Range {
            spec: RangeSpec::parse("range(d20000101:d20301231)").unwrap(),
        }),
    ])
    .unwrap()
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }
    let Ok(mut file) = tempfile::NamedTempFile::new() else {
        return;
    };
    if file.write_all(data).is_err() {
        return;
    }

    let dialect = Dialect::default().without_header();
    let Ok((supplier, _)) = CsvRowSupplier::open(file.path(), &dialect) else {
        return;
    };
    let loader = InMemoryResources::new();
    let custom = CustomRegistry::new();
    let mut sink = MemorySink::new();
    let Ok(engine) = Engine::new(&columns(), &loader, &custom, &mut sink, EngineOptions::default())
    else {
        return;
    };
    let outcome = engine.run(supplier);
    if let Some(report) = outcome.report {
        assert!(report.totals.rows_processed + report.totals.malformed_rows <= report.totals.rows_read);
    }
});
