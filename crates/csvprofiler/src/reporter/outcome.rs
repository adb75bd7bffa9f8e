//! Test outcomes and the records forwarded to error sinks.

use serde::{Deserialize, Serialize};

use crate::schema::ErrorCategory;

/// Why a value failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// Empty value where blank is an error.
    Blank,
    TooShort { min: usize, length: usize },
    TooLong { max: usize, length: usize },
    /// The main test did not match.
    Mismatch,
    /// The key column's value has no rule.
    UnknownKey { key_column: String, key: String },
    /// The value is not permitted for the key.
    NotAllowed {
        key_column: String,
        key: String,
        allowed: String,
    },
    /// A custom function said no.
    Rejected { message: String },
}

impl FailureReason {
    /// Human-readable description for a failure of `test`.
    pub fn message(&self, test: &str) -> String {
        match self {
            FailureReason::Blank => "blank value".to_string(),
            FailureReason::TooShort { min, length } => {
                format!("length {length} is less than minimum {min}")
            }
            FailureReason::TooLong { max, length } => {
                format!("length {length} exceeds maximum {max}")
            }
            FailureReason::Mismatch => format!("value fails {test}"),
            FailureReason::UnknownKey { key_column, key } => {
                format!("{key_column} '{key}' not found in {test}")
            }
            FailureReason::NotAllowed {
                key_column,
                key,
                allowed,
            } => format!("value not allowed when {key_column} is '{key}' (allowed: {allowed})"),
            FailureReason::Rejected { message } => message.clone(),
        }
    }
}

/// Result of one check on one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    /// Name of the test that ran, e.g. `lookup_states` or `length`.
    pub test: String,
    pub category: ErrorCategory,
    /// The value as evaluated (after stripping).
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl TestOutcome {
    pub fn pass(test: impl Into<String>, category: ErrorCategory, value: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            category,
            value: value.into(),
            reason: None,
        }
    }

    pub fn fail(
        test: impl Into<String>,
        category: ErrorCategory,
        value: impl Into<String>,
        reason: FailureReason,
    ) -> Self {
        Self {
            test: test.into(),
            category,
            value: value.into(),
            reason: Some(reason),
        }
    }

    pub fn passed(&self) -> bool {
        self.reason.is_none()
    }

    /// Failure message, empty for a pass.
    pub fn message(&self) -> String {
        self.reason
            .as_ref()
            .map(|r| r.message(&self.test))
            .unwrap_or_default()
    }
}

/// A failure as handed to an [`ErrorSink`](super::ErrorSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// 1-based data row number.
    pub row: u64,
    pub column: String,
    pub test: String,
    pub category: ErrorCategory,
    pub value: String,
    pub message: String,
    /// Value of the configured key column, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl FailureRecord {
    pub fn from_outcome(row: u64, column: &str, outcome: &TestOutcome, key: Option<&str>) -> Self {
        Self {
            row,
            column: column.to_string(),
            test: outcome.test.clone(),
            category: outcome.category,
            value: outcome.value.clone(),
            message: outcome.message(),
            key: key.map(str::to_string),
        }
    }
}

/// A row whose field count did not match the column count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRow {
    pub row: u64,
    pub expected: usize,
    pub found: usize,
    pub fields: Vec<String>,
}

impl MalformedRow {
    pub fn message(&self) -> String {
        format!(
            "row has {} fields, expected {}",
            self.found, self.expected
        )
    }
}
