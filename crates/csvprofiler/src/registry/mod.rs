//! Test registry: turns column definitions into executable checks.
//!
//! Patterns are compiled and lists and rule tables loaded once per run, no
//! matter how many columns refer to them. Evaluation never fails; every
//! check produces a [`TestOutcome`].

mod coordinates;
mod custom;
mod named;
mod resources;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::error::{ProfilerError, Result};
use crate::reporter::{FailureReason, TestOutcome};
use crate::schema::{
    ColumnDefinition, ColumnSet, ErrorCategory, LookupSource, PatternSource, RangeSpec, TestKind,
};
use crate::xref::{CrossReferenceResolver, CrossReferenceResult, CrossReferenceRuleTable};

pub use custom::{CustomFn, CustomOutcome, CustomRegistry, RowContext};
pub use named::{builtin_matches, catalogue, compile_full_match};
pub use resources::{FileResources, InMemoryResources, ResourceLoader};

/// Name under which length failures are reported.
pub const LENGTH_TEST: &str = "length";
/// Name under which blank failures are reported.
pub const BLANK_TEST: &str = "blank";

/// The executable form of a column's main test.
#[derive(Clone)]
enum Check {
    Builtin(TestKind),
    Regex(Arc<Regex>),
    Lookup(Arc<HashSet<String>>),
    Range(RangeSpec),
    CrossReference(CrossReferenceResolver),
    Custom(Arc<CustomFn>),
}

/// A column definition with its resources bound.
#[derive(Clone)]
pub struct CompiledColumn {
    definition: ColumnDefinition,
    test_name: String,
    check: Check,
}

/// Everything checked for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEvaluation {
    /// The value after stripping was empty.
    pub blank: bool,
    /// Length of the evaluated value, in characters.
    pub length: usize,
    /// One outcome per check that ran.
    pub outcomes: Vec<TestOutcome>,
}

impl FieldEvaluation {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(TestOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl CompiledColumn {
    pub fn definition(&self) -> &ColumnDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Name of the main test as written in the param file.
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// True for lookup columns, whose misses are tallied when profiling.
    pub fn is_lookup(&self) -> bool {
        matches!(self.check, Check::Lookup(_))
    }

    pub fn cross_reference(&self) -> Option<&CrossReferenceResolver> {
        match &self.check {
            Check::CrossReference(resolver) => Some(resolver),
            _ => None,
        }
    }

    /// Applies the column's strip setting.
    pub fn normalize<'a>(&self, raw: &'a str) -> &'a str {
        self.definition.normalize(raw)
    }

    /// Runs strip, blank, length and main checks, in that order.
    ///
    /// A blank value skips the length and main checks, except that a
    /// cross-reference column still reports a key missing from its table.
    /// `ctx` must hold the row's values already normalized per column.
    pub fn evaluate(&self, raw: &str, ctx: &RowContext<'_>) -> FieldEvaluation {
        let def = &self.definition;
        let value = self.normalize(raw);
        let mut outcomes = Vec::new();

        if value.is_empty() {
            if def.blank_is_error {
                outcomes.push(TestOutcome::fail(
                    BLANK_TEST,
                    ErrorCategory::Blank,
                    value,
                    FailureReason::Blank,
                ));
            }
            // An unknown key fails whatever the dependent value holds.
            if self.cross_reference().is_some() {
                let outcome = self.run_main(value, ctx);
                if matches!(outcome.reason, Some(FailureReason::UnknownKey { .. })) {
                    outcomes.push(outcome);
                }
            }
            return FieldEvaluation {
                blank: true,
                length: 0,
                outcomes,
            };
        }

        let length = value.chars().count();
        if def.has_length_check() {
            let reason = match (def.min_length, def.max_length) {
                (Some(min), _) if length < min => Some(FailureReason::TooShort { min, length }),
                (_, Some(max)) if length > max => Some(FailureReason::TooLong { max, length }),
                _ => None,
            };
            outcomes.push(match reason {
                Some(reason) => TestOutcome::fail(LENGTH_TEST, ErrorCategory::Length, value, reason),
                None => TestOutcome::pass(LENGTH_TEST, ErrorCategory::Length, value),
            });
        }

        if !def.test.is_anything() {
            outcomes.push(self.run_main(value, ctx));
        }

        FieldEvaluation {
            blank: false,
            length,
            outcomes,
        }
    }

    fn run_main(&self, value: &str, ctx: &RowContext<'_>) -> TestOutcome {
        let category = self.definition.test.category();
        let verdict = match &self.check {
            Check::Builtin(kind) => builtin_matches(kind, value)
                .unwrap_or(true)
                .then_some(())
                .ok_or(FailureReason::Mismatch),
            Check::Regex(re) => re.is_match(value).then_some(()).ok_or(FailureReason::Mismatch),
            Check::Lookup(set) => set.contains(value).then_some(()).ok_or(FailureReason::Mismatch),
            Check::Range(range) => range.contains(value).then_some(()).ok_or(FailureReason::Mismatch),
            Check::CrossReference(resolver) => {
                let key = ctx.field(resolver.key_position()).unwrap_or("");
                match resolver.resolve(key, value) {
                    CrossReferenceResult::Allowed | CrossReferenceResult::Unconstrained => Ok(()),
                    CrossReferenceResult::UnknownKey { key } => Err(FailureReason::UnknownKey {
                        key_column: resolver.key_column().to_string(),
                        key,
                    }),
                    CrossReferenceResult::NotAllowed { key, allowed } => {
                        Err(FailureReason::NotAllowed {
                            key_column: resolver.key_column().to_string(),
                            key,
                            allowed,
                        })
                    }
                }
            }
            Check::Custom(function) => {
                let outcome = function(value, ctx);
                if outcome.passed {
                    Ok(())
                } else {
                    Err(FailureReason::Rejected {
                        message: outcome
                            .message
                            .unwrap_or_else(|| format!("value rejected by {}", self.test_name)),
                    })
                }
            }
        };

        match verdict {
            Ok(()) => TestOutcome::pass(&self.test_name, category, value),
            Err(reason) => TestOutcome::fail(&self.test_name, category, value, reason),
        }
    }
}

impl std::fmt::Debug for CompiledColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledColumn")
            .field("name", &self.definition.name)
            .field("test", &self.test_name)
            .finish()
    }
}

/// Binds column tests to compiled resources.
pub struct TestRegistry<'a> {
    loader: &'a dyn ResourceLoader,
    custom: &'a CustomRegistry,
    patterns: HashMap<PatternSource, Arc<Regex>>,
    lookups: HashMap<LookupSource, Arc<HashSet<String>>>,
    tables: HashMap<String, Arc<CrossReferenceRuleTable>>,
}

impl<'a> TestRegistry<'a> {
    pub fn new(loader: &'a dyn ResourceLoader, custom: &'a CustomRegistry) -> Self {
        Self {
            loader,
            custom,
            patterns: HashMap::new(),
            lookups: HashMap::new(),
            tables: HashMap::new(),
        }
    }

    /// Compiles every column. Fails on the first column that cannot be bound.
    pub fn compile(&mut self, columns: &ColumnSet) -> Result<Vec<CompiledColumn>> {
        columns
            .columns()
            .iter()
            .map(|def| self.compile_column(columns, def))
            .collect()
    }

    fn compile_column(
        &mut self,
        columns: &ColumnSet,
        def: &ColumnDefinition,
    ) -> Result<CompiledColumn> {
        let check = match &def.test {
            TestKind::Regex { name, source } => Check::Regex(self.pattern(name, source)?),
            TestKind::Lookup { name, source } => Check::Lookup(self.lookup(name, source)?),
            TestKind::Range { spec } => Check::Range(spec.clone()),
            TestKind::CrossReference { key_column, table } => {
                let table = self.rule_table(table)?;
                Check::CrossReference(CrossReferenceResolver::new(
                    columns, &def.name, key_column, table,
                )?)
            }
            TestKind::Custom { function } => {
                Check::Custom(self.custom.get(function).ok_or_else(|| {
                    ProfilerError::config(format!(
                        "column '{}' uses custom_{function} but no such function is registered",
                        def.name
                    ))
                })?)
            }
            builtin => Check::Builtin(builtin.clone()),
        };

        let compiled = CompiledColumn {
            definition: def.clone(),
            test_name: def.test.to_string(),
            check,
        };
        debug!(column = %def.name, test = %compiled.test_name, "Compiled column test");
        Ok(compiled)
    }

    fn pattern(&mut self, name: &str, source: &PatternSource) -> Result<Arc<Regex>> {
        if let Some(re) = self.patterns.get(source) {
            return Ok(Arc::clone(re));
        }
        let text = match source {
            PatternSource::Inline(text) => text.clone(),
            PatternSource::Resource(resource) => self.loader.load_pattern(resource)?,
        };
        let re = compile_full_match(&text).map_err(|source| ProfilerError::InvalidPattern {
            name: format!("regex_{name}"),
            source,
        })?;
        let re = Arc::new(re);
        self.patterns.insert(source.clone(), Arc::clone(&re));
        Ok(re)
    }

    fn lookup(&mut self, name: &str, source: &LookupSource) -> Result<Arc<HashSet<String>>> {
        if let Some(set) = self.lookups.get(source) {
            return Ok(Arc::clone(set));
        }
        let values = match source {
            LookupSource::Inline(values) => values.clone(),
            LookupSource::Resource(resource) => self.loader.load_lookup(resource)?,
        };
        if values.is_empty() {
            return Err(ProfilerError::resource(
                format!("lookup_{name}"),
                "lookup list is empty",
            ));
        }
        let set = Arc::new(values.into_iter().collect::<HashSet<_>>());
        self.lookups.insert(source.clone(), Arc::clone(&set));
        Ok(set)
    }

    fn rule_table(&mut self, name: &str) -> Result<Arc<CrossReferenceRuleTable>> {
        if let Some(table) = self.tables.get(name) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(self.loader.load_rule_table(name)?);
        self.tables.insert(name.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Number of distinct resources loaded so far.
    pub fn loaded_resources(&self) -> usize {
        self.patterns.len() + self.lookups.len() + self.tables.len()
    }
}
