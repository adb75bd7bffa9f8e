//! The streaming engine.
//!
//! An [`Engine`] binds a column specification to its resources, then takes
//! rows one at a time: each field is evaluated, counted and, if it failed,
//! offered to the error reporter. The engine moves through
//! `Init -> Streaming -> Finalizing -> Done`; any fatal error moves it to
//! `Aborted`, and a report is still produced for the rows already seen.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ProfilerError, Result};
use crate::input::{RowRecord, RowSupplier};
use crate::registry::{
    CompiledColumn, CustomRegistry, FieldEvaluation, ResourceLoader, RowContext, TestRegistry,
};
use crate::report::RunReport;
use crate::reporter::{ErrorReporter, ErrorSink, MalformedRow, TestOutcome};
use crate::schema::{ColumnSet, Limit};
use crate::stats::StatisticsAggregator;

/// Default number of rows between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Init,
    Streaming,
    Finalizing,
    Done,
    Aborted,
}

/// What to do with rows whose field count is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Skip the row and count it.
    Skip,
    /// Skip and count, but abort once more than `threshold` rows were malformed.
    AbortAfter { threshold: u64 },
}

impl Default for MalformedRowPolicy {
    fn default() -> Self {
        MalformedRowPolicy::Skip
    }
}

/// Run options that are not part of the column specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub malformed_rows: MalformedRowPolicy,
    /// Run-wide cap on rows that may emit failure records.
    pub error_row_limit: Limit,
    /// 0-based index of the column whose value labels failure records.
    pub key_column: Option<usize>,
    pub progress_interval: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            malformed_rows: MalformedRowPolicy::default(),
            error_row_limit: Limit::Unlimited,
            key_column: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Done,
    Aborted { reason: String },
}

impl RunStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, RunStatus::Done)
    }
}

/// Terminal status plus the report, if one could be produced.
///
/// There is no report only when the run aborted before streaming began.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub report: Option<RunReport>,
}

impl RunOutcome {
    /// Outcome of a run whose engine could not be built.
    pub fn aborted_at_init(error: &ProfilerError) -> Self {
        Self {
            status: RunStatus::Aborted {
                reason: error.to_string(),
            },
            report: None,
        }
    }
}

/// Validates and profiles rows against a compiled column specification.
pub struct Engine<S: ErrorSink> {
    state: EngineState,
    columns: Vec<CompiledColumn>,
    names: Vec<String>,
    stats: StatisticsAggregator,
    reporter: ErrorReporter<S>,
    options: EngineOptions,
    rows_seen: u64,
    started_at: chrono::DateTime<Utc>,
}

impl<S: ErrorSink> Engine<S> {
    /// Compiles `columns` and prepares for streaming.
    ///
    /// Fails with a configuration or resource error if any column cannot be
    /// bound; nothing is returned half-built.
    pub fn new(
        columns: &ColumnSet,
        loader: &dyn ResourceLoader,
        custom: &CustomRegistry,
        sink: S,
        options: EngineOptions,
    ) -> Result<Self> {
        let mut registry = TestRegistry::new(loader, custom);
        let compiled = registry.compile(columns)?;
        debug!(
            columns = compiled.len(),
            resources = registry.loaded_resources(),
            "Column specification compiled"
        );

        if let Some(key) = options.key_column {
            if key >= compiled.len() {
                return Err(ProfilerError::config(format!(
                    "key column {} is out of range for {} columns",
                    key + 1,
                    compiled.len()
                )));
            }
        }

        let reporter = ErrorReporter::new(
            sink,
            compiled
                .iter()
                .map(|c| (c.name().to_string(), c.definition().error_limits.clone())),
        )
        .with_row_cap(options.error_row_limit);

        Ok(Self {
            state: EngineState::Streaming,
            names: compiled.iter().map(|c| c.name().to_string()).collect(),
            stats: StatisticsAggregator::new(&compiled),
            columns: compiled,
            reporter,
            options,
            rows_seen: 0,
            started_at: Utc::now(),
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn columns(&self) -> &[CompiledColumn] {
        &self.columns
    }

    pub fn statistics(&self) -> &StatisticsAggregator {
        &self.stats
    }

    pub fn reporter(&self) -> &ErrorReporter<S> {
        &self.reporter
    }

    /// Evaluates one row.
    ///
    /// Returns an error only for fatal conditions: an exceeded malformed-row
    /// threshold or a sink failure. The engine is then aborted.
    pub fn process_row(&mut self, fields: Vec<String>) -> Result<()> {
        if self.state != EngineState::Streaming {
            return Err(ProfilerError::config(format!(
                "engine cannot accept rows in state {:?}",
                self.state
            )));
        }
        self.rows_seen += 1;
        let record = RowRecord {
            number: self.rows_seen,
            fields,
        };
        let result = self.process_record(record);
        if result.is_err() {
            self.state = EngineState::Aborted;
        }
        result
    }

    fn process_record(&mut self, record: RowRecord) -> Result<()> {
        self.stats.record_read();
        let interval = self.options.progress_interval;
        if interval > 0 && record.number % interval == 0 {
            info!(rows = record.number, "Processing");
        }

        if record.fields.len() != self.columns.len() {
            return self.handle_malformed(record);
        }

        let values: Vec<&str> = self
            .columns
            .iter()
            .zip(&record.fields)
            .map(|(column, raw)| column.normalize(raw))
            .collect();

        let evaluations: Vec<FieldEvaluation> = self
            .columns
            .iter()
            .zip(&record.fields)
            .map(|(column, raw)| {
                let ctx = RowContext::new(
                    record.number,
                    column.name(),
                    &self.names,
                    &values,
                    &column.definition().user_data,
                );
                column.evaluate(raw, &ctx)
            })
            .collect();

        for (index, eval) in evaluations.iter().enumerate() {
            self.stats.record_field(index, record.number, values[index], eval);
        }

        let failures: Vec<(usize, &TestOutcome)> = evaluations
            .iter()
            .enumerate()
            .flat_map(|(index, eval)| eval.failures().map(move |outcome| (index, outcome)))
            .collect();

        let emitted = if failures.is_empty() {
            0
        } else {
            let key = self
                .options
                .key_column
                .and_then(|k| values.get(k).copied());
            self.reporter.report_row(record.number, &failures, key)?
        };
        self.stats.record_emitted(emitted);
        self.stats.record_row(!failures.is_empty());
        Ok(())
    }

    fn handle_malformed(&mut self, record: RowRecord) -> Result<()> {
        self.stats.record_malformed();
        let malformed = self.stats.totals().malformed_rows;
        warn!(
            row = record.number,
            expected = self.columns.len(),
            found = record.fields.len(),
            "Skipping malformed row"
        );
        let notice = MalformedRow {
            row: record.number,
            expected: self.columns.len(),
            found: record.fields.len(),
            fields: record.fields,
        };
        self.reporter.report_malformed(&notice)?;

        if let MalformedRowPolicy::AbortAfter { threshold } = self.options.malformed_rows {
            if malformed > threshold {
                return Err(ProfilerError::MalformedRowLimit {
                    malformed,
                    threshold,
                });
            }
        }
        Ok(())
    }

    /// Drains `supplier`, then finalizes.
    pub fn run<R: RowSupplier>(mut self, mut supplier: R) -> RunOutcome {
        info!(columns = self.columns.len(), "Run started");
        loop {
            match supplier.next_row() {
                Ok(Some(fields)) => {
                    if let Err(e) = self.process_row(fields) {
                        return self.abort(e);
                    }
                }
                Ok(None) => break,
                Err(e) => return self.abort(e),
            }
        }
        self.finish()
    }

    /// Ends the run normally: flushes the sink and freezes the statistics.
    pub fn finish(mut self) -> RunOutcome {
        if self.state == EngineState::Aborted {
            return self.abort(ProfilerError::config("engine was already aborted"));
        }
        self.state = EngineState::Finalizing;
        if let Err(e) = self.reporter.finish() {
            return self.abort(e);
        }
        self.state = EngineState::Done;
        let report = self.freeze(None);
        info!(
            rows = report.totals.rows_processed,
            failures = report.totals.total_failures(),
            emitted = report.totals.failures_emitted,
            "Run finished"
        );
        RunOutcome {
            status: RunStatus::Done,
            report: Some(report),
        }
    }

    /// Ends the run early. The report covers the rows processed so far.
    pub fn abort(mut self, error: ProfilerError) -> RunOutcome {
        let reason = error.to_string();
        warn!(reason = %reason, rows = self.stats.totals().rows_read, "Run aborted");
        self.state = EngineState::Aborted;
        if let Err(e) = self.reporter.finish() {
            warn!(error = %e, "Error sink could not be flushed");
        }
        let report = self.freeze(Some(reason.clone()));
        RunOutcome {
            status: RunStatus::Aborted { reason },
            report: Some(report),
        }
    }

    fn freeze(self, termination: Option<String>) -> RunReport {
        let (columns, totals) = self.stats.freeze();
        RunReport::new(columns, totals, self.started_at, Utc::now(), termination)
    }
}
