//! The complete, validated set of column definitions for one run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};

use super::column::ColumnDefinition;
use super::types::TestKind;

/// Column definitions in input order.
///
/// A `ColumnSet` is only ever built whole: construction validates every
/// definition and the references between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnDefinition>", into = "Vec<ColumnDefinition>")]
pub struct ColumnSet {
    columns: Vec<ColumnDefinition>,
}

impl ColumnSet {
    /// Validate and freeze a list of definitions.
    ///
    /// Positions are reassigned from list order.
    pub fn new(mut columns: Vec<ColumnDefinition>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ProfilerError::config("no columns defined"));
        }

        let mut seen = HashSet::new();
        for (position, column) in columns.iter_mut().enumerate() {
            column.position = position;
            column.validate()?;
            if !seen.insert(column.name.clone()) {
                return Err(ProfilerError::config(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        for column in &columns {
            if let TestKind::CrossReference { key_column, .. } = &column.test {
                if key_column == &column.name {
                    return Err(ProfilerError::config(format!(
                        "column '{}' cannot be its own cross-reference key",
                        column.name
                    )));
                }
                if !seen.contains(key_column) {
                    return Err(ProfilerError::config(format!(
                        "column '{}' references unknown key column '{key_column}'",
                        column.name
                    )));
                }
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Get a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Zero-based position of a named column.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<Vec<ColumnDefinition>> for ColumnSet {
    type Error = ProfilerError;

    fn try_from(columns: Vec<ColumnDefinition>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<ColumnSet> for Vec<ColumnDefinition> {
    fn from(set: ColumnSet) -> Self {
        set.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xref(name: &str, key: &str) -> ColumnDefinition {
        ColumnDefinition::new(name, 0).with_test(TestKind::CrossReference {
            key_column: key.into(),
            table: "rules".into(),
        })
    }

    #[test]
    fn test_positions_follow_order() {
        let set = ColumnSet::new(vec![
            ColumnDefinition::new("a", 7),
            ColumnDefinition::new("b", 7),
        ])
        .unwrap();
        assert_eq!(set.position_of("b"), Some(1));
        assert_eq!(set.get("a").unwrap().position, 0);
        assert_eq!(set.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(ColumnSet::new(Vec::new()).is_err());
        let dup = ColumnSet::new(vec![
            ColumnDefinition::new("a", 0),
            ColumnDefinition::new("a", 1),
        ]);
        assert!(dup.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_cross_reference_key_must_exist() {
        let ok = ColumnSet::new(vec![ColumnDefinition::new("Dept", 0), xref("State", "Dept")]);
        assert!(ok.is_ok());

        let missing = ColumnSet::new(vec![ColumnDefinition::new("Dept", 0), xref("State", "Region")]);
        assert!(missing.is_err());

        let own = ColumnSet::new(vec![xref("State", "State")]);
        assert!(own.is_err());
    }
}
