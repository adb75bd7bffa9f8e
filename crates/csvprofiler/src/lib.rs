//! csvprofiler: column validation and profiling for delimited text files.
//!
//! Each column of an input file is declared in a param file: the test its
//! values must pass, length bounds, whether blanks are errors, how failures
//! are throttled and whether values are profiled. The engine streams the
//! file once, evaluates every field, counts the results and forwards failure
//! records to one or more sinks.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use csvprofiler::Profiler;
//!
//! let profiler = Profiler::from_config_file(Path::new("orders_csvp.json")).unwrap();
//! let outcome = profiler.run().unwrap();
//!
//! if let Some(report) = &outcome.report {
//!     println!("Rows processed: {}", report.totals.rows_processed);
//!     println!("Failures: {}", report.totals.total_failures());
//! }
//! ```
//!
//! The engine can also be driven directly with in-memory rows:
//!
//! ```
//! use csvprofiler::input::rows_from;
//! use csvprofiler::registry::{CustomRegistry, InMemoryResources};
//! use csvprofiler::reporter::MemorySink;
//! use csvprofiler::schema::{ColumnDefinition, ColumnSet, TestKind};
//! use csvprofiler::{Engine, EngineOptions};
//!
//! let columns = ColumnSet::new(vec![
//!     ColumnDefinition::new("Id", 0).with_test(TestKind::Digit),
//! ])
//! .unwrap();
//! let loader = InMemoryResources::new();
//! let custom = CustomRegistry::new();
//! let mut sink = MemorySink::new();
//!
//! let engine = Engine::new(&columns, &loader, &custom, &mut sink, EngineOptions::default()).unwrap();
//! let rows: Vec<&[&str]> = vec![&["12"], &["x"]];
//! let outcome = engine.run(rows_from(rows));
//!
//! assert!(outcome.status.is_done());
//! assert_eq!(sink.records.len(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod input;
pub mod profiler;
pub mod registry;
pub mod report;
pub mod reporter;
pub mod schema;
pub mod stats;
pub mod template;
pub mod xref;

pub use engine::{
    Engine, EngineOptions, EngineState, MalformedRowPolicy, RunOutcome, RunStatus,
};
pub use error::{ProfilerError, Result};
pub use profiler::{Profiler, ProfilerConfig};
pub use report::{RunReport, TextReport};
pub use schema::{ColumnDefinition, ColumnSet, ErrorCategory, Limit, ProfileMode, TestKind};
pub use template::{Template, TemplateGenerator};
