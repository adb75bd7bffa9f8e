//! Property-based tests for the engine and its building blocks.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p csvprofiler --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p csvprofiler --test property_tests
//! ```

use proptest::prelude::*;

use csvprofiler::input::IterSupplier;
use csvprofiler::registry::{CustomRegistry, InMemoryResources, builtin_matches};
use csvprofiler::reporter::MemorySink;
use csvprofiler::schema::{
    ColumnDefinition, ColumnSet, ErrorCategory, Limit, RangeSpec, TestKind, parse_params,
    write_params,
};
use csvprofiler::{Engine, EngineOptions, RunReport};

// =============================================================================
// Test Strategies
// =============================================================================

/// Field values: digits, words, blanks and padded values.
fn field() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,5}",
        "[a-zA-Z]{1,8}",
        Just(String::new()),
        " [0-9]{1,3} ",
        "[ -~]{0,12}",
    ]
}

fn rows(width: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(field(), width), 0..60)
}

fn limited(mut column: ColumnDefinition, limit: Limit) -> ColumnDefinition {
    for category in ErrorCategory::ALL {
        column = column.with_limit(category, limit);
    }
    column
}

fn columns(limit: Limit) -> ColumnSet {
    ColumnSet::new(vec![
        limited(
            ColumnDefinition::new("Id", 0)
                .with_test(TestKind::Digit)
                .with_strip(true),
            limit,
        ),
        limited(
            ColumnDefinition::new("Name", 1)
                .with_test(TestKind::Alpha)
                .with_length(Some(2), Some(6))
                .with_blank_is_error(true),
            limit,
        ),
    ])
    .unwrap()
}

fn run(set: &ColumnSet, rows: Vec<Vec<String>>) -> (RunReport, MemorySink) {
    let loader = InMemoryResources::new();
    let custom = CustomRegistry::new();
    let mut sink = MemorySink::new();
    let engine = Engine::new(set, &loader, &custom, &mut sink, EngineOptions::default()).unwrap();
    let report = engine.run(IterSupplier::new(rows)).report.unwrap();
    (report, sink)
}

// =============================================================================
// Engine Properties
// =============================================================================

proptest! {
    /// Emitted records never exceed a column's limit; counts are unaffected.
    #[test]
    fn limit_bounds_emission(data in rows(2), n in 0u64..5) {
        let (limited, sink) = run(&columns(Limit::Max(n)), data.clone());
        let (unlimited, _) = run(&columns(Limit::Unlimited), data);

        for (index, column) in limited.columns.iter().enumerate() {
            for category in ErrorCategory::ALL {
                let emitted = sink
                    .records
                    .iter()
                    .filter(|r| r.column == column.name && r.category == category)
                    .count() as u64;
                prop_assert!(emitted <= n);
                prop_assert_eq!(
                    column.failures(category),
                    unlimited.columns[index].failures(category)
                );
            }
        }
    }

    /// Every well-formed row is counted once per column.
    #[test]
    fn total_rows_counts_well_formed_rows(data in rows(2), extra in prop::collection::vec(field(), 3)) {
        let mut data = data;
        let expected = data.len() as u64;
        data.push(extra);
        let (report, _) = run(&columns(Limit::Unlimited), data);

        prop_assert_eq!(report.totals.malformed_rows, 1);
        for column in &report.columns {
            prop_assert_eq!(column.total_rows, expected);
        }
    }

    /// Same rows, same statistics and the same records.
    #[test]
    fn runs_are_deterministic(data in rows(2)) {
        let set = columns(Limit::Max(3));
        let (first, first_sink) = run(&set, data.clone());
        let (second, second_sink) = run(&set, data);
        prop_assert_eq!(first.columns, second.columns);
        prop_assert_eq!(first.totals, second.totals);
        prop_assert_eq!(first_sink.records, second_sink.records);
    }
}

// =============================================================================
// Building Block Properties
// =============================================================================

proptest! {
    /// Integer ranges accept exactly the values between their bounds.
    #[test]
    fn int_range_is_inclusive(a in -1000i64..1000, span in 0i64..1000, v in -3000i64..3000) {
        let b = a + span;
        let spec = RangeSpec::parse(&format!("range({a}:{b})")).unwrap();
        prop_assert_eq!(spec.contains(&v.to_string()), a <= v && v <= b);
    }

    /// Stripping recovers the digits from padded input.
    #[test]
    fn strip_matches_trimmed_value(digits in "[1-9][0-9]{0,6}", left in " {0,3}", right in " {0,3}") {
        let padded = format!("{left}{digits}{right}");
        let column = ColumnDefinition::new("Id", 0).with_strip(true);
        prop_assert_eq!(column.normalize(&padded), digits.as_str());
        prop_assert_eq!(builtin_matches(&TestKind::Digit, column.normalize(&padded)), Some(true));
    }

    /// Built-in tests never panic on arbitrary text.
    #[test]
    fn builtin_tests_never_panic(value in "\\PC{0,40}") {
        for test in csvprofiler::registry::catalogue() {
            let _ = builtin_matches(&test, &value);
        }
    }

    /// Written param files parse back to the same limits and lengths.
    #[test]
    fn param_limits_survive_writing(n in 1u64..10_000, min in 1usize..20, extra in 0usize..20) {
        let definition = ColumnDefinition::new("Code", 0)
            .with_test(TestKind::Alphanumeric)
            .with_length(Some(min), Some(min + extra))
            .with_limit(ErrorCategory::Format, Limit::Max(n))
            .with_limit(ErrorCategory::Blank, Limit::Suppressed);
        let mut out = Vec::new();
        write_params(std::slice::from_ref(&definition), &mut out).unwrap();
        let parsed = parse_params(out.as_slice()).unwrap();
        let column = parsed.get("Code").unwrap();
        prop_assert_eq!(column.min_length, Some(min));
        prop_assert_eq!(column.max_length, Some(min + extra));
        prop_assert_eq!(column.error_limits.get(ErrorCategory::Format), Limit::Max(n));
        prop_assert_eq!(column.error_limits.get(ErrorCategory::Blank), Limit::Suppressed);
    }
}
