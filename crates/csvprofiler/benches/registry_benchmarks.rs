//! Test registry benchmarks.
//!
//! Measures built-in test evaluation, range checks and template sampling.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use csvprofiler::TemplateGenerator;
use csvprofiler::input::IterSupplier;
use csvprofiler::registry::{builtin_matches, catalogue};
use csvprofiler::schema::RangeSpec;

/// Values covering most built-in test families.
const SAMPLES: &[&str] = &[
    "12345",
    "Smith",
    "A1B2C3",
    "Corp.",
    "2024-03-15",
    "3/15/2024",
    "jane.doe@example.com",
    "192.168.10.4",
    "(555) 123-4567",
    "10027",
    "10027-1234",
    "NY",
    "-42.5",
    "1.5e3",
    "$1,234.56",
    "https://example.com/path",
    "not a match at all",
    "",
];

/// Benchmark every catalogue test against every sample.
fn bench_catalogue(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalogue");
    for test in catalogue() {
        group.bench_with_input(BenchmarkId::new("test", test.to_string()), &test, |b, test| {
            b.iter(|| {
                for value in SAMPLES {
                    black_box(builtin_matches(test, value));
                }
            })
        });
    }
    group.finish();
}

/// Benchmark range checks for each value type.
fn bench_ranges(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");
    let cases = [
        ("int", "range(1:99)", "42"),
        ("float", "range(0.5:99.5)", "42.25"),
        ("date", "range(d20200101:d20251231)", "3/15/2024"),
    ];
    for (name, spec, value) in cases {
        let spec = RangeSpec::parse(spec).unwrap();
        group.bench_function(name, |b| b.iter(|| black_box(spec.contains(black_box(value)))));
    }
    group.finish();
}

/// Benchmark sampling rows for a param template.
fn bench_template(c: &mut Criterion) {
    let rows: Vec<Vec<String>> = (0..997)
        .map(|i| {
            vec![
                i.to_string(),
                format!("user{i}@example.com"),
                SAMPLES[i % SAMPLES.len()].to_string(),
            ]
        })
        .collect();
    let header: Vec<String> = ["Id", "Email", "Mixed"].map(String::from).to_vec();

    c.bench_function("template_997_rows", |b| {
        b.iter_with_setup(
            || rows.clone(),
            |rows| {
                black_box(
                    TemplateGenerator::new()
                        .analyze(Some(header.clone()), IterSupplier::new(rows))
                        .unwrap(),
                )
            },
        )
    });
}

criterion_group!(benches, bench_catalogue, bench_ranges, bench_template);
criterion_main!(benches);
