//! Per-column cross-reference evaluation.

use std::sync::Arc;

use crate::error::{ProfilerError, Result};
use crate::schema::ColumnSet;

use super::rules::CrossReferenceRuleTable;

/// Result of checking one dependent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossReferenceResult {
    /// The value satisfies the rule for the key.
    Allowed,
    /// The key has no rule for this column.
    Unconstrained,
    /// Neither the key nor a wildcard is in the table.
    UnknownKey { key: String },
    /// The value is not permitted for the key.
    NotAllowed { key: String, allowed: String },
}

impl CrossReferenceResult {
    pub fn passed(&self) -> bool {
        matches!(
            self,
            CrossReferenceResult::Allowed | CrossReferenceResult::Unconstrained
        )
    }
}

/// Resolves one dependent column against its key column.
#[derive(Debug, Clone)]
pub struct CrossReferenceResolver {
    column: String,
    key_column: String,
    key_position: usize,
    table: Arc<CrossReferenceRuleTable>,
}

impl CrossReferenceResolver {
    /// Binds `column` to `key_column` through `table`.
    pub fn new(
        columns: &ColumnSet,
        column: &str,
        key_column: &str,
        table: Arc<CrossReferenceRuleTable>,
    ) -> Result<Self> {
        let key_position = columns.position_of(key_column).ok_or_else(|| {
            ProfilerError::config(format!(
                "cross-reference for '{column}' uses unknown key column '{key_column}'"
            ))
        })?;
        Ok(Self {
            column: column.to_string(),
            key_column: key_column.to_string(),
            key_position,
            table,
        })
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Position of the key column in the row.
    pub fn key_position(&self) -> usize {
        self.key_position
    }

    pub fn table(&self) -> &CrossReferenceRuleTable {
        &self.table
    }

    /// Checks `value` given the row's (normalized) key value.
    pub fn resolve(&self, key: &str, value: &str) -> CrossReferenceResult {
        let Some(rules) = self.table.rules_for(key) else {
            return CrossReferenceResult::UnknownKey {
                key: key.to_string(),
            };
        };
        match rules.get(&self.column) {
            None => CrossReferenceResult::Unconstrained,
            Some(spec) if spec.allows(value) => CrossReferenceResult::Allowed,
            Some(spec) => CrossReferenceResult::NotAllowed {
                key: key.to_string(),
                allowed: spec.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, TestKind};

    fn columns() -> ColumnSet {
        let xref = |name: &str| {
            ColumnDefinition::new(name, 0).with_test(TestKind::CrossReference {
                key_column: "Dept".into(),
                table: "territory".into(),
            })
        };
        ColumnSet::new(vec![
            ColumnDefinition::new("Dept", 0),
            xref("Territory"),
            xref("State"),
        ])
        .unwrap()
    }

    fn table() -> Arc<CrossReferenceRuleTable> {
        Arc::new(
            CrossReferenceRuleTable::new("territory")
                .with_rule("Finance", "Territory", "E")
                .unwrap()
                .with_rule("Finance", "State", "NY|PA")
                .unwrap()
                .with_rule("Legal", "Territory", "W")
                .unwrap(),
        )
    }

    #[test]
    fn test_allowed_and_not_allowed() {
        let state = CrossReferenceResolver::new(&columns(), "State", "Dept", table()).unwrap();
        assert_eq!(state.key_position(), 0);
        assert_eq!(state.resolve("Finance", "NY"), CrossReferenceResult::Allowed);
        assert_eq!(
            state.resolve("Finance", "FL"),
            CrossReferenceResult::NotAllowed {
                key: "Finance".into(),
                allowed: "NY|PA".into()
            }
        );
    }

    #[test]
    fn test_unknown_key_ignores_value() {
        let state = CrossReferenceResolver::new(&columns(), "State", "Dept", table()).unwrap();
        for value in ["NY", "FL", ""] {
            assert_eq!(
                state.resolve("Marketing", value),
                CrossReferenceResult::UnknownKey {
                    key: "Marketing".into()
                }
            );
        }
    }

    #[test]
    fn test_key_without_rule_for_column_is_unconstrained() {
        let state = CrossReferenceResolver::new(&columns(), "State", "Dept", table()).unwrap();
        let result = state.resolve("Legal", "anything");
        assert_eq!(result, CrossReferenceResult::Unconstrained);
        assert!(result.passed());
    }

    #[test]
    fn test_unknown_key_column_is_config_error() {
        let err = CrossReferenceResolver::new(&columns(), "State", "Region", table()).unwrap_err();
        assert!(err.is_config_error());
    }
}
