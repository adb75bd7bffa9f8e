//! User-supplied test functions.
//!
//! Functions are registered by name before a run and bound to their columns
//! once, when the engine is built.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// What a custom function sees of the current row.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    row: u64,
    column: &'a str,
    names: &'a [String],
    values: &'a [&'a str],
    user_data: &'a [String],
}

impl<'a> RowContext<'a> {
    pub fn new(
        row: u64,
        column: &'a str,
        names: &'a [String],
        values: &'a [&'a str],
        user_data: &'a [String],
    ) -> Self {
        Self {
            row,
            column,
            names,
            values,
            user_data,
        }
    }

    /// 1-based data row number.
    pub fn row(&self) -> u64 {
        self.row
    }

    /// Name of the column being tested.
    pub fn column(&self) -> &'a str {
        self.column
    }

    /// Value of another column in the same row, after that column's strip
    /// setting has been applied.
    pub fn value(&self, column: &str) -> Option<&'a str> {
        let position = self.names.iter().position(|n| n == column)?;
        self.values.get(position).copied()
    }

    /// Value at a zero-based position.
    pub fn field(&self, position: usize) -> Option<&'a str> {
        self.values.get(position).copied()
    }

    /// The tested column's user data cells.
    pub fn user_data(&self) -> &'a [String] {
        self.user_data
    }
}

/// Pass/fail verdict of a custom function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOutcome {
    pub passed: bool,
    pub message: Option<String>,
}

impl CustomOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    pub fn fail() -> Self {
        Self {
            passed: false,
            message: None,
        }
    }

    pub fn fail_with(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
        }
    }
}

impl From<bool> for CustomOutcome {
    fn from(passed: bool) -> Self {
        if passed { Self::pass() } else { Self::fail() }
    }
}

/// Signature of a custom test.
pub type CustomFn = dyn Fn(&str, &RowContext<'_>) -> CustomOutcome + Send + Sync;

/// Named custom functions, referenced from param files as `custom_<name>`.
#[derive(Clone, Default)]
pub struct CustomRegistry {
    functions: IndexMap<String, Arc<CustomFn>>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under `name`, replacing any earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&str, &RowContext<'_>) -> CustomOutcome + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&str, &RowContext<'_>) -> CustomOutcome + Send + Sync + 'static,
    {
        self.register(name, function);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<CustomFn>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_call() {
        let registry = CustomRegistry::new().with("even", |value, _ctx| {
            value.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false).into()
        });
        assert!(registry.contains("even"));
        let even = registry.get("even").unwrap();

        let names = vec!["n".to_string()];
        let values = ["4"];
        let ctx = RowContext::new(1, "n", &names, &values, &[]);
        assert!(even("4", &ctx).passed);
        assert!(!even("5", &ctx).passed);
    }

    #[test]
    fn test_row_context_lookup() {
        let names = vec!["Dept".to_string(), "State".to_string()];
        let values = ["Finance", "NY"];
        let data = vec!["extra".to_string()];
        let ctx = RowContext::new(3, "State", &names, &values, &data);
        assert_eq!(ctx.row(), 3);
        assert_eq!(ctx.column(), "State");
        assert_eq!(ctx.value("Dept"), Some("Finance"));
        assert_eq!(ctx.value("Missing"), None);
        assert_eq!(ctx.field(1), Some("NY"));
        assert_eq!(ctx.user_data(), &["extra".to_string()]);
    }

    #[test]
    fn test_fail_with_message() {
        let outcome = CustomOutcome::fail_with("not a known code");
        assert!(!outcome.passed);
        assert_eq!(outcome.message.as_deref(), Some("not a known code"));
    }
}
