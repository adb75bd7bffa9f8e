//! Column definition.

use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};

use super::types::{ErrorCategory, ErrorLimits, Limit, ProfileMode, TestKind};

/// Everything the engine needs to know about one input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Zero-based position in the input row.
    pub position: usize,
    /// Main test.
    #[serde(default)]
    pub test: TestKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub profile: ProfileMode,
    /// An empty value is itself a failure.
    #[serde(default)]
    pub blank_is_error: bool,
    /// Trim surrounding whitespace before any check.
    #[serde(default)]
    pub strip: bool,
    #[serde(default)]
    pub error_limits: ErrorLimits,
    /// Opaque parameters for cross-reference and custom tests.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_data: Vec<String>,
}

impl ColumnDefinition {
    /// Create a definition with no test and no constraints.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            test: TestKind::Anything,
            min_length: None,
            max_length: None,
            profile: ProfileMode::Off,
            blank_is_error: false,
            strip: false,
            error_limits: ErrorLimits::new(),
            user_data: Vec::new(),
        }
    }

    pub fn with_test(mut self, test: TestKind) -> Self {
        self.test = test;
        self
    }

    /// Set both length bounds.
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_profile(mut self, profile: ProfileMode) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_blank_is_error(mut self, blank_is_error: bool) -> Self {
        self.blank_is_error = blank_is_error;
        self
    }

    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    pub fn with_limit(mut self, category: ErrorCategory, limit: Limit) -> Self {
        self.error_limits.set(category, limit);
        self
    }

    pub fn with_user_data(mut self, user_data: Vec<String>) -> Self {
        self.user_data = user_data;
        self
    }

    /// Check internal consistency of the definition.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ProfilerError::config(format!(
                "column {} has a blank name",
                self.position + 1
            )));
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ProfilerError::config(format!(
                    "column '{}': min length {min} is greater than max length {max}",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// True when length bounds apply.
    pub fn has_length_check(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// Returns the value with surrounding whitespace removed when `strip` is set.
    pub fn normalize<'a>(&self, raw: &'a str) -> &'a str {
        if self.strip { raw.trim() } else { raw }
    }
}
