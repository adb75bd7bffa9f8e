//! Input handling: dialects, source metadata and row suppliers.

mod dialect;
mod source;
mod supplier;

pub use dialect::{Dialect, detect_delimiter};
pub use source::SourceMetadata;
pub use supplier::{CsvRowSupplier, IterSupplier, RowRecord, RowSupplier, rows_from};
