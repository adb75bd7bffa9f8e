//! Error reporting: throttles failures and forwards them to a sink.
//!
//! Each column carries one counter per [`ErrorCategory`], checked against the
//! column's [`ErrorLimits`]. An optional run-wide cap then limits how many
//! rows may produce records at all. Statistics are kept elsewhere and count
//! every failure regardless of what is emitted here.

mod outcome;
mod sink;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::schema::{ErrorCategory, ErrorLimits, Limit};

pub use outcome::{FailureReason, FailureRecord, MalformedRow, TestOutcome};
pub use sink::{CsvErrorSink, ErrorSink, LogSink, MemorySink};

#[derive(Debug, Clone)]
struct ColumnEmission {
    name: String,
    limits: ErrorLimits,
    emitted: BTreeMap<ErrorCategory, u64>,
}

impl ColumnEmission {
    fn emitted(&self, category: ErrorCategory) -> u64 {
        self.emitted.get(&category).copied().unwrap_or(0)
    }
}

/// Per-column, per-category emission limiter in front of an [`ErrorSink`].
pub struct ErrorReporter<S: ErrorSink> {
    sink: S,
    columns: Vec<ColumnEmission>,
    row_cap: Limit,
    rows_emitted: u64,
    records_emitted: u64,
}

impl<S: ErrorSink> ErrorReporter<S> {
    /// `columns` pairs each column name with its limits, in declaration order.
    pub fn new<I>(sink: S, columns: I) -> Self
    where
        I: IntoIterator<Item = (String, ErrorLimits)>,
    {
        Self {
            sink,
            columns: columns
                .into_iter()
                .map(|(name, limits)| ColumnEmission {
                    name,
                    limits,
                    emitted: BTreeMap::new(),
                })
                .collect(),
            row_cap: Limit::Unlimited,
            rows_emitted: 0,
            records_emitted: 0,
        }
    }

    /// Caps the number of rows that may emit records.
    pub fn with_row_cap(mut self, cap: Limit) -> Self {
        self.row_cap = cap;
        self
    }

    /// Forwards the failures of one row, subject to the limits.
    ///
    /// `failures` pairs a column index with a failing outcome. Returns the
    /// number of records emitted for this row.
    pub fn report_row(
        &mut self,
        row: u64,
        failures: &[(usize, &TestOutcome)],
        key: Option<&str>,
    ) -> Result<u64> {
        let mut pending: BTreeMap<(usize, ErrorCategory), u64> = BTreeMap::new();
        let mut selected = Vec::new();

        for &(index, outcome) in failures {
            let Some(column) = self.columns.get(index) else {
                continue;
            };
            let category = outcome.category;
            let slot = pending.entry((index, category)).or_insert(0);
            if column.limits.get(category).allows(column.emitted(category) + *slot) {
                *slot += 1;
                selected.push((index, outcome));
            }
        }

        if selected.is_empty() || !self.row_cap.allows(self.rows_emitted) {
            return Ok(0);
        }

        for (index, outcome) in &selected {
            let column = &self.columns[*index];
            let record = FailureRecord::from_outcome(row, &column.name, outcome, key);
            self.sink.emit(&record)?;
        }
        for ((index, category), count) in pending {
            if count > 0 {
                *self.columns[index].emitted.entry(category).or_insert(0) += count;
            }
        }

        let emitted = selected.len() as u64;
        self.rows_emitted += 1;
        self.records_emitted += emitted;
        Ok(emitted)
    }

    /// Forwards a malformed row notice. Counts against the row cap.
    pub fn report_malformed(&mut self, row: &MalformedRow) -> Result<bool> {
        if !self.row_cap.allows(self.rows_emitted) {
            return Ok(false);
        }
        self.sink.emit_malformed(row)?;
        self.rows_emitted += 1;
        Ok(true)
    }

    /// Records emitted for one column and category so far.
    pub fn emitted(&self, column: usize, category: ErrorCategory) -> u64 {
        self.columns
            .get(column)
            .map(|c| c.emitted(category))
            .unwrap_or(0)
    }

    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    pub fn rows_emitted(&self) -> u64 {
        self.rows_emitted
    }

    /// True once the row cap stops further emission.
    pub fn is_capped(&self) -> bool {
        !self.row_cap.allows(self.rows_emitted)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flushes the sink.
    pub fn finish(&mut self) -> Result<()> {
        self.sink.finish()
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
