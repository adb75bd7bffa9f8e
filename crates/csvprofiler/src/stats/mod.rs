//! Per-column statistics and run totals.
//!
//! Distinct values are kept for every profiled column for the whole run.
//! Memory therefore grows with the number of distinct values per profiled
//! column.

mod numeric;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::registry::{CompiledColumn, FieldEvaluation};
use crate::reporter::FailureReason;
use crate::schema::{ErrorCategory, ProfileMode};

pub use numeric::{NumericStatistics, StreamingStats, parse_finite};

/// Cross-reference results for one dependent column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReferenceCounts {
    pub passed: u64,
    pub not_allowed: u64,
    pub unknown_key: u64,
}

/// Counters for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub position: usize,
    /// Main test name as written in the param file.
    pub test: String,
    /// Rows evaluated for this column.
    pub total_rows: u64,
    pub blank_count: u64,
    /// Non-blank values with no failure.
    pub passed: u64,
    #[serde(default)]
    pub fail_counts: BTreeMap<ErrorCategory, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Occurrences of each non-blank value, sorted by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_values: Option<IndexMap<String, u64>>,
    /// Values missing from the lookup list, with counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_misses: Option<IndexMap<String, u64>>,
    /// Duplicated values with every row they appeared on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<IndexMap<String, Vec<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStatistics>,
    /// Values left out of the numeric summary, with their rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded: Option<IndexMap<String, Vec<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_reference: Option<CrossReferenceCounts>,
}

impl ColumnStatistics {
    fn new(column: &CompiledColumn) -> Self {
        let def = column.definition();
        let profiled = def.profile.is_enabled();
        Self {
            name: def.name.clone(),
            position: def.position,
            test: column.test_name().to_string(),
            total_rows: 0,
            blank_count: 0,
            passed: 0,
            fail_counts: BTreeMap::new(),
            min_length: None,
            max_length: None,
            distinct_values: profiled.then(IndexMap::new),
            lookup_misses: (profiled && column.is_lookup()).then(IndexMap::new),
            duplicates: (def.profile == ProfileMode::Unique).then(IndexMap::new),
            numeric: None,
            discarded: (def.profile == ProfileMode::Statistical).then(IndexMap::new),
            cross_reference: column
                .cross_reference()
                .map(|_| CrossReferenceCounts::default()),
        }
    }

    /// Failures counted for one category.
    pub fn failures(&self, category: ErrorCategory) -> u64 {
        self.fail_counts.get(&category).copied().unwrap_or(0)
    }

    /// Failures over all categories.
    pub fn total_failures(&self) -> u64 {
        self.fail_counts.values().sum()
    }

    /// Number of distinct non-blank values, when profiled.
    pub fn unique_values(&self) -> Option<usize> {
        self.distinct_values.as_ref().map(IndexMap::len)
    }
}

/// Run-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Rows taken from the supplier, malformed ones included.
    pub rows_read: u64,
    /// Well-formed rows that were evaluated.
    pub rows_processed: u64,
    pub malformed_rows: u64,
    /// Rows with at least one failure.
    pub rows_with_failures: u64,
    /// Failure records forwarded to the sink.
    pub failures_emitted: u64,
    /// Rows for which at least one record was forwarded.
    pub rows_emitted: u64,
    /// Failures per category over all columns.
    #[serde(default)]
    pub failures: BTreeMap<ErrorCategory, u64>,
}

impl RunTotals {
    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }
}

#[derive(Debug)]
struct ColumnAccumulator {
    stats: ColumnStatistics,
    first_seen: Option<IndexMap<String, u64>>,
    numeric: Option<StreamingStats>,
}

/// Owns every counter of a run. One per engine.
#[derive(Debug)]
pub struct StatisticsAggregator {
    columns: Vec<ColumnAccumulator>,
    totals: RunTotals,
}

impl StatisticsAggregator {
    pub fn new(columns: &[CompiledColumn]) -> Self {
        let columns = columns
            .iter()
            .map(|column| {
                let profile = column.definition().profile;
                ColumnAccumulator {
                    stats: ColumnStatistics::new(column),
                    first_seen: (profile == ProfileMode::Unique).then(IndexMap::new),
                    numeric: (profile == ProfileMode::Statistical).then(StreamingStats::new),
                }
            })
            .collect();
        Self {
            columns,
            totals: RunTotals::default(),
        }
    }

    /// A row was taken from the supplier.
    pub fn record_read(&mut self) {
        self.totals.rows_read += 1;
    }

    /// A row had the wrong number of fields and was skipped.
    pub fn record_malformed(&mut self) {
        self.totals.malformed_rows += 1;
    }

    /// Folds one field's evaluation into its column's counters.
    pub fn record_field(&mut self, index: usize, row: u64, value: &str, eval: &FieldEvaluation) {
        let Some(acc) = self.columns.get_mut(index) else {
            return;
        };
        let stats = &mut acc.stats;
        stats.total_rows += 1;

        for outcome in &eval.outcomes {
            if outcome.category == ErrorCategory::CrossReference {
                if let Some(xref) = stats.cross_reference.as_mut() {
                    match &outcome.reason {
                        None => xref.passed += 1,
                        Some(FailureReason::UnknownKey { .. }) => xref.unknown_key += 1,
                        Some(_) => xref.not_allowed += 1,
                    }
                }
            }
            if !outcome.passed() {
                *stats.fail_counts.entry(outcome.category).or_insert(0) += 1;
                *self.totals.failures.entry(outcome.category).or_insert(0) += 1;
                if let Some(misses) = stats.lookup_misses.as_mut() {
                    if outcome.category == ErrorCategory::Format {
                        *misses.entry(value.to_string()).or_insert(0) += 1;
                    }
                }
            }
        }

        if eval.blank {
            stats.blank_count += 1;
            return;
        }
        if eval.passed() {
            stats.passed += 1;
        }

        stats.min_length = Some(stats.min_length.map_or(eval.length, |m| m.min(eval.length)));
        stats.max_length = Some(stats.max_length.map_or(eval.length, |m| m.max(eval.length)));

        // Lookup misses are tallied apart from the matched values.
        let missed = stats.lookup_misses.is_some()
            && eval.failures().any(|o| o.category == ErrorCategory::Format);
        if let Some(counts) = stats.distinct_values.as_mut().filter(|_| !missed) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }

        if let Some(first_seen) = acc.first_seen.as_mut() {
            match first_seen.get(value) {
                Some(&first) => {
                    if let Some(duplicates) = stats.duplicates.as_mut() {
                        duplicates
                            .entry(value.to_string())
                            .or_insert_with(|| vec![first])
                            .push(row);
                    }
                }
                None => {
                    first_seen.insert(value.to_string(), row);
                }
            }
        }

        if let Some(numeric) = acc.numeric.as_mut() {
            match parse_finite(value) {
                Some(v) => numeric.add(v),
                None => {
                    if let Some(discarded) = stats.discarded.as_mut() {
                        discarded.entry(value.to_string()).or_default().push(row);
                    }
                }
            }
        }
    }

    /// A well-formed row finished evaluating.
    pub fn record_row(&mut self, had_failure: bool) {
        self.totals.rows_processed += 1;
        if had_failure {
            self.totals.rows_with_failures += 1;
        }
    }

    /// Records forwarded to the sink for one row.
    pub fn record_emitted(&mut self, records: u64) {
        if records > 0 {
            self.totals.failures_emitted += records;
            self.totals.rows_emitted += 1;
        }
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    pub fn column(&self, index: usize) -> Option<&ColumnStatistics> {
        self.columns.get(index).map(|acc| &acc.stats)
    }

    /// Freezes the counters. Profiles are sorted by value.
    pub fn freeze(self) -> (Vec<ColumnStatistics>, RunTotals) {
        let columns = self
            .columns
            .into_iter()
            .map(|acc| {
                let mut stats = acc.stats;
                if let Some(counts) = stats.distinct_values.as_mut() {
                    counts.sort_keys();
                }
                if let Some(misses) = stats.lookup_misses.as_mut() {
                    misses.sort_keys();
                }
                stats.numeric = acc.numeric.as_ref().and_then(StreamingStats::summary);
                stats
            })
            .collect();
        (columns, self.totals)
    }
}
