//! Column specification: test kinds, limits, definitions and the param file.

mod column;
mod params;
mod range;
mod table;
mod types;

pub use column::ColumnDefinition;
pub use params::{parse_params, read_param_file, write_params};
pub use range::{RangeBounds, RangeSpec, ValueType, parse_date};
pub use table::ColumnSet;
pub use types::{
    ErrorCategory, ErrorLimits, Limit, LookupSource, NamedTest, PatternSource, ProfileMode,
    TestKind,
};
