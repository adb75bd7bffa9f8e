//! The frozen result of a run and its text rendering.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::SourceMetadata;
use crate::schema::ErrorCategory;
use crate::stats::{ColumnStatistics, RunTotals};

/// Statistics snapshot handed to report formatters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Files involved in the run, by role.
    #[serde(default)]
    pub files: IndexMap<String, String>,
    pub totals: RunTotals,
    pub columns: Vec<ColumnStatistics>,
    /// Why the run ended early, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<String>,
}

impl RunReport {
    pub fn new(
        columns: Vec<ColumnStatistics>,
        totals: RunTotals,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        termination: Option<String>,
    ) -> Self {
        Self {
            started_at,
            finished_at,
            source: None,
            files: IndexMap::new(),
            totals,
            columns,
            termination,
        }
    }

    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    /// Records a file under a role such as `"Parameter File"`.
    pub fn with_file(mut self, role: impl Into<String>, path: impl Into<String>) -> Self {
        self.files.insert(role.into(), path.into());
        self
    }

    /// True if every row was read.
    pub fn is_complete(&self) -> bool {
        self.termination.is_none()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn text(&self) -> TextReport<'_> {
        TextReport { report: self }
    }
}

/// Plain-text report, one block per column.
pub struct TextReport<'a> {
    report: &'a RunReport,
}

/// Formats an integer with comma thousands separators.
pub fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{label:>25} = {value}")
}

impl TextReport<'_> {
    fn header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        writeln!(
            f,
            "csvprofiler (v{}) started {}",
            env!("CARGO_PKG_VERSION"),
            r.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f)?;
        for (role, path) in &r.files {
            writeln!(f, "{role:<15} = {path}")?;
        }
        if let Some(source) = &r.source {
            writeln!(f, "{:<15} = {}", "Input SHA-256", source.hash)?;
            writeln!(f, "{:<15} = {}", "Input Size", grouped(source.size_bytes))?;
            writeln!(f, "{:<15} = {}", "Input Format", source.format())?;
        }
        Ok(())
    }

    fn column(&self, f: &mut fmt::Formatter<'_>, c: &ColumnStatistics) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "({}) {} -> {}", c.position + 1, c.name, c.test)?;
        line(f, "rows", grouped(c.total_rows))?;
        line(f, "blank", grouped(c.blank_count))?;
        line(f, "passed", grouped(c.passed))?;
        for category in ErrorCategory::ALL {
            let count = c.failures(category);
            if count > 0 {
                line(f, &format!("{category} errors"), grouped(count))?;
            }
        }
        if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
            line(f, "min length", min)?;
            line(f, "max length", max)?;
        }

        if let Some(xref) = &c.cross_reference {
            writeln!(f, "\n  *** Cross Reference ***")?;
            line(f, "passed", grouped(xref.passed))?;
            line(f, "not allowed", grouped(xref.not_allowed))?;
            line(f, "unknown key", grouped(xref.unknown_key))?;
        }

        if let Some(values) = &c.distinct_values {
            writeln!(f, "\n  *** Column Profile ***")?;
            for (value, count) in values {
                line(f, value, grouped(*count))?;
            }
            line(f, "(unique values)", grouped(values.len() as u64))?;
        }

        if let Some(misses) = &c.lookup_misses {
            if !misses.is_empty() {
                writeln!(f, "\n *** Lookup Failures ***")?;
                for (value, count) in misses {
                    line(f, value, grouped(*count))?;
                }
                line(f, "(unique values)", grouped(misses.len() as u64))?;
            }
        }

        if let Some(duplicates) = &c.duplicates {
            writeln!(f, "\n  *** Unique Profile Results ***")?;
            if duplicates.is_empty() {
                writeln!(f, "      No duplicates found")?;
            } else {
                writeln!(f, "  ***    Duplicates Found    ***")?;
                writeln!(f, "{:>25} : record sequence numbers", "value")?;
                for (value, rows) in duplicates {
                    let rows: Vec<String> = rows.iter().map(u64::to_string).collect();
                    writeln!(f, "{value:>25} : {}", rows.join(", "))?;
                }
                let extra: usize = duplicates.values().map(|rows| rows.len() - 1).sum();
                line(f, "(duplicated values)", grouped(duplicates.len() as u64))?;
                line(f, "(total duplicates)", grouped(extra as u64))?;
            }
        }

        if let Some(numeric) = &c.numeric {
            writeln!(f, "\n  *** Statistics ***")?;
            line(f, "count", grouped(numeric.count))?;
            line(f, "min", format!("{:.4}", numeric.min))?;
            line(f, "max", format!("{:.4}", numeric.max))?;
            line(f, "mean", format!("{:.4}", numeric.mean))?;
            line(f, "std", format!("{:.4}", numeric.std))?;
            line(f, "q1", format!("{:.4}", numeric.q1))?;
            line(f, "median", format!("{:.4}", numeric.median))?;
            line(f, "q3", format!("{:.4}", numeric.q3))?;
            line(f, "var", format!("{:.4}", numeric.var))?;
            line(f, "mad", format!("{:.4}", numeric.mad))?;
            line(f, "sem", format!("{:.4}", numeric.sem))?;
            if let Some(skew) = numeric.skew {
                line(f, "skew", format!("{skew:.4}"))?;
            }
            if let Some(kurt) = numeric.kurt {
                line(f, "kurt", format!("{kurt:.4}"))?;
            }
        }
        if let Some(discarded) = &c.discarded {
            if !discarded.is_empty() {
                writeln!(f, "\n  *** Non-numeric Values ***")?;
                for (value, rows) in discarded {
                    let rows: Vec<String> = rows.iter().map(u64::to_string).collect();
                    writeln!(f, "{value:>25} : {}", rows.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let t = &r.totals;
        self.header(f)?;

        writeln!(
            f,
            "\n******************** csvprofile column report *******************\n"
        )?;
        line(f, "rows processed", grouped(t.rows_processed))?;
        line(f, "rows with errors", grouped(t.rows_with_failures))?;
        for category in ErrorCategory::ALL {
            let count = t.failures.get(&category).copied().unwrap_or(0);
            line(f, &format!("{category} errors"), grouped(count))?;
        }

        for column in &r.columns {
            self.column(f, column)?;
        }

        writeln!(f)?;
        writeln!(f, "       Total Records Read = {}", grouped(t.rows_read))?;
        writeln!(f, "        Total Bad Records = {}", grouped(t.malformed_rows))?;
        writeln!(f, "     Total Errors Written = {}", grouped(t.failures_emitted))?;
        writeln!(f, "  Total Records w/ Errors = {}", grouped(t.rows_emitted))?;
        if let Some(reason) = &r.termination {
            writeln!(f)?;
            writeln!(f, "Run terminated early: {reason}")?;
            writeln!(
                f,
                "Report covers {} rows; {} malformed rows skipped",
                grouped(t.rows_processed),
                grouped(t.malformed_rows)
            )?;
        }
        let elapsed = r.finished_at - r.started_at;
        writeln!(
            f,
            "\nFinished {} ({:.3}s)",
            r.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
            elapsed.num_milliseconds() as f64 / 1000.0
        )
    }
}
