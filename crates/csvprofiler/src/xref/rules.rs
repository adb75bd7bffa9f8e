//! Cross-reference rule tables.

use std::fmt;
use std::io::Read;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ProfilerError, Result};
use crate::schema::RangeSpec;

/// Key that matches any value not listed in a table.
pub const WILDCARD_KEY: &str = "*";

/// What a dependent column may hold for one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AllowedValueSpec {
    /// Exactly this value.
    Literal(String),
    /// Any of these values (`A|B|C`).
    AnyOf(Vec<String>),
    /// Inclusive range (`range(a:b)`).
    Range(RangeSpec),
    /// No constraint (`nothing`).
    Unconstrained,
}

impl AllowedValueSpec {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text == "nothing" {
            Ok(AllowedValueSpec::Unconstrained)
        } else if text.starts_with("range(") {
            Ok(AllowedValueSpec::Range(RangeSpec::parse(text)?))
        } else if text.contains('|') {
            Ok(AllowedValueSpec::AnyOf(
                text.split('|').map(|v| v.trim().to_string()).collect(),
            ))
        } else {
            Ok(AllowedValueSpec::Literal(text.to_string()))
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        match self {
            AllowedValueSpec::Literal(expected) => value == expected,
            AllowedValueSpec::AnyOf(values) => values.iter().any(|v| v == value),
            AllowedValueSpec::Range(range) => range.contains(value),
            AllowedValueSpec::Unconstrained => true,
        }
    }
}

impl fmt::Display for AllowedValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowedValueSpec::Literal(v) => f.write_str(v),
            AllowedValueSpec::AnyOf(values) => f.write_str(&values.join("|")),
            AllowedValueSpec::Range(range) => write!(f, "{range}"),
            AllowedValueSpec::Unconstrained => f.write_str("nothing"),
        }
    }
}

/// Maps key values to the values their dependent columns may hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossReferenceRuleTable {
    name: String,
    entries: IndexMap<String, IndexMap<String, AllowedValueSpec>>,
}

impl CrossReferenceRuleTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of keys, the wildcard included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds one `(key, column) -> allowed` rule.
    ///
    /// A second rule for the same key and column is an error.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        column: impl Into<String>,
        allowed: AllowedValueSpec,
    ) -> Result<()> {
        let key = key.into();
        let column = column.into();
        let rules = self.entries.entry(key.clone()).or_default();
        if rules.contains_key(&column) {
            return Err(ProfilerError::config(format!(
                "rule table '{}' has more than one rule for key '{key}', column '{column}'",
                self.name
            )));
        }
        rules.insert(column, allowed);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert) taking the rule text.
    pub fn with_rule(mut self, key: &str, column: &str, allowed: &str) -> Result<Self> {
        self.insert(key, column, AllowedValueSpec::parse(allowed)?)?;
        Ok(self)
    }

    /// Reads a `key,column,allowed` CSV table.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let expected = ["key", "column", "allowed"];
        if headers.len() != expected.len()
            || headers.iter().zip(expected).any(|(h, e)| !h.eq_ignore_ascii_case(e))
        {
            return Err(ProfilerError::resource(
                name,
                "rule table header must be 'key,column,allowed'",
            ));
        }

        let mut table = Self::new(name);
        for record in csv_reader.records() {
            let record = record?;
            let (Some(key), Some(column), Some(allowed)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                continue;
            };
            if key.is_empty() || column.is_empty() {
                return Err(ProfilerError::resource(
                    name,
                    format!(
                        "rule on line {} needs a key and a column",
                        record.position().map(|p| p.line()).unwrap_or(0)
                    ),
                ));
            }
            table.insert(key, column, AllowedValueSpec::parse(allowed)?)?;
        }
        Ok(table)
    }

    /// Rules for a key value, falling back to the wildcard entry.
    pub fn rules_for(&self, key: &str) -> Option<&IndexMap<String, AllowedValueSpec>> {
        self.entries
            .get(key)
            .or_else(|| self.entries.get(WILDCARD_KEY))
    }

    /// Key values in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
