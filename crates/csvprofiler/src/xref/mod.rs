//! Cross-reference rules: permitted values of one column keyed by another
//! column's value in the same row.
//!
//! Every declared cross-reference is evaluated on its own. Rules are not
//! chained, so `Dept -> Territory` and `Territory -> State` are two
//! independent checks.

mod resolver;
mod rules;

pub use resolver::{CrossReferenceResolver, CrossReferenceResult};
pub use rules::{AllowedValueSpec, CrossReferenceRuleTable, WILDCARD_KEY};
