//! Row suppliers: the lazy, finite stream of rows the engine consumes.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ProfilerError, Result};

use super::dialect::Dialect;
use super::source::SourceMetadata;

/// Bytes read to detect the delimiter.
const SNIFF_BYTES: u64 = 64 * 1024;

/// One input line handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// 1-based data row number (the header is not counted).
    pub number: u64,
    pub fields: Vec<String>,
}

/// Produces rows one at a time. `Ok(None)` marks the end of input; the
/// stream cannot be restarted.
pub trait RowSupplier {
    fn next_row(&mut self) -> Result<Option<Vec<String>>>;
}

impl<S: RowSupplier + ?Sized> RowSupplier for &mut S {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        (**self).next_row()
    }
}

/// Supplies rows from an in-memory iterator.
pub struct IterSupplier<I> {
    rows: I,
}

impl<I> IterSupplier<I>
where
    I: Iterator<Item = Vec<String>>,
{
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<I> RowSupplier for IterSupplier<I>
where
    I: Iterator<Item = Vec<String>>,
{
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        Ok(self.rows.next())
    }
}

/// Builds an [`IterSupplier`] from string slices, mostly for tests.
pub fn rows_from<'a, R>(rows: R) -> IterSupplier<std::vec::IntoIter<Vec<String>>>
where
    R: IntoIterator<Item = &'a [&'a str]>,
{
    let owned: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect();
    IterSupplier::new(owned)
}

/// Reads rows from delimited text.
///
/// Fields are decoded lossily, so invalid UTF-8 becomes U+FFFD rather than
/// stopping the run. Fully empty lines are skipped: they are neither rows
/// nor malformed rows, and they do not advance the row number.
pub struct CsvRowSupplier<R: Read> {
    reader: csv::Reader<R>,
    header: Option<Vec<String>>,
    record: csv::ByteRecord,
    delimiter: u8,
}

impl CsvRowSupplier<File> {
    /// Opens `path`, detecting the delimiter if the dialect leaves it unset.
    pub fn open(path: &Path, dialect: &Dialect) -> Result<(Self, SourceMetadata)> {
        let mut file = File::open(path).map_err(|e| ProfilerError::io(path, e))?;
        let mut sample = Vec::new();
        (&mut file)
            .take(SNIFF_BYTES)
            .read_to_end(&mut sample)
            .map_err(|e| ProfilerError::io(path, e))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| ProfilerError::io(path, e))?;

        let delimiter = dialect.resolve_delimiter(&sample)?;
        debug!(path = %path.display(), delimiter = %(delimiter as char), "opening input");
        let metadata = SourceMetadata::inspect(path, delimiter)?;
        Ok((Self::with_delimiter(file, dialect, delimiter)?, metadata))
    }
}

impl<R: Read> CsvRowSupplier<R> {
    /// Reads from `reader`. Without an explicit delimiter a comma is used.
    pub fn from_reader(reader: R, dialect: &Dialect) -> Result<Self> {
        let delimiter = match dialect.delimiter {
            Some(_) => dialect.resolve_delimiter(&[])?,
            None => b',',
        };
        Self::with_delimiter(reader, dialect, delimiter)
    }

    fn with_delimiter(reader: R, dialect: &Dialect, delimiter: u8) -> Result<Self> {
        let mut reader = dialect.reader_builder(delimiter)?.from_reader(reader);
        let header = if dialect.has_header {
            Some(decode(reader.byte_headers()?))
        } else {
            None
        };
        Ok(Self {
            reader,
            header,
            record: csv::ByteRecord::new(),
            delimiter,
        })
    }

    /// Column names from the header row, when the dialect has one.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Checks the header against the declared column names.
    ///
    /// A different column count is fatal. Different names are only logged,
    /// since columns are matched by position.
    pub fn check_header(&self, names: &[&str]) -> Result<()> {
        let Some(header) = &self.header else {
            return Ok(());
        };
        if header.len() != names.len() {
            return Err(ProfilerError::HeaderMismatch {
                expected: names.len(),
                found: header.len(),
            });
        }
        for (found, expected) in header.iter().zip(names) {
            if found.trim() != *expected {
                warn!(expected = %expected, found = %found, "header name differs from column specification");
            }
        }
        Ok(())
    }
}

impl<R: Read> RowSupplier for CsvRowSupplier<R> {
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(decode(&self.record)))
    }
}

fn decode(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<S: RowSupplier>(mut supplier: S) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        while let Some(row) = supplier.next_row().unwrap() {
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_reads_rows_after_header() {
        let data = "name,age\nAlice,30\nBob,25\n";
        let supplier = CsvRowSupplier::from_reader(data.as_bytes(), &Dialect::default()).unwrap();
        assert_eq!(supplier.header().unwrap(), &["name", "age"]);
        let rows = drain(supplier);
        assert_eq!(rows, vec![vec!["Alice", "30"], vec!["Bob", "25"]]);
    }

    #[test]
    fn test_ragged_rows_are_returned() {
        let data = "a,b\n1,2,3\n4\n";
        let rows = drain(CsvRowSupplier::from_reader(data.as_bytes(), &Dialect::default()).unwrap());
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let data = "a,b\n1,2\n\n\r\n3,4\n\n";
        let rows = drain(CsvRowSupplier::from_reader(data.as_bytes(), &Dialect::default()).unwrap());
        assert_eq!(rows, vec![vec!["1", "2"], vec!["3", "4"]]);

        // A line holding only a delimiter is a row of empty fields.
        let data = "a,b\n,\n";
        let rows = drain(CsvRowSupplier::from_reader(data.as_bytes(), &Dialect::default()).unwrap());
        assert_eq!(rows, vec![vec!["", ""]]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let data: &[u8] = b"a\nx\xffy\n";
        let rows = drain(CsvRowSupplier::from_reader(data, &Dialect::default()).unwrap());
        assert_eq!(rows[0][0], "x\u{fffd}y");
    }

    #[test]
    fn test_header_count_mismatch() {
        let data = "a,b,c\n1,2,3\n";
        let supplier = CsvRowSupplier::from_reader(data.as_bytes(), &Dialect::default()).unwrap();
        let err = supplier.check_header(&["a", "b"]).unwrap_err();
        assert!(matches!(err, ProfilerError::HeaderMismatch { expected: 2, found: 3 }));
        assert!(supplier.check_header(&["a", "b", "renamed"]).is_ok());
    }

    #[test]
    fn test_no_header_dialect() {
        let data = "1,2\n3,4\n";
        let dialect = Dialect::default().without_header();
        let supplier = CsvRowSupplier::from_reader(data.as_bytes(), &dialect).unwrap();
        assert!(supplier.header().is_none());
        assert_eq!(drain(supplier).len(), 2);
    }

    #[test]
    fn test_open_detects_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.tsv");
        std::fs::write(&path, "a\tb\n1\t2\n").unwrap();
        let (supplier, meta) = CsvRowSupplier::open(&path, &Dialect::default()).unwrap();
        assert_eq!(supplier.delimiter(), b'\t');
        assert_eq!(meta.format(), "tsv");
        assert_eq!(drain(supplier), vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_iter_supplier() {
        let rows: Vec<&[&str]> = vec![&["a", "b"], &["c", "d"]];
        assert_eq!(drain(rows_from(rows)).len(), 2);
    }
}
