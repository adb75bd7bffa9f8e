//! Destinations for failure records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ProfilerError, Result};

use super::outcome::{FailureRecord, MalformedRow};

/// Receives failure records as the engine emits them.
pub trait ErrorSink {
    fn emit(&mut self, record: &FailureRecord) -> Result<()>;

    /// Receives a malformed row notice. Ignored by default.
    fn emit_malformed(&mut self, _row: &MalformedRow) -> Result<()> {
        Ok(())
    }

    /// Flushes buffered output. Called once when the run ends, successful or not.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    fn emit(&mut self, record: &FailureRecord) -> Result<()> {
        (**self).emit(record)
    }

    fn emit_malformed(&mut self, row: &MalformedRow) -> Result<()> {
        (**self).emit_malformed(row)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for Box<S> {
    fn emit(&mut self, record: &FailureRecord) -> Result<()> {
        (**self).emit(record)
    }

    fn emit_malformed(&mut self, row: &MalformedRow) -> Result<()> {
        (**self).emit_malformed(row)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Fans records out to several sinks, in order.
impl<S: ErrorSink> ErrorSink for Vec<S> {
    fn emit(&mut self, record: &FailureRecord) -> Result<()> {
        self.iter_mut().try_for_each(|sink| sink.emit(record))
    }

    fn emit_malformed(&mut self, row: &MalformedRow) -> Result<()> {
        self.iter_mut().try_for_each(|sink| sink.emit_malformed(row))
    }

    /// Every sink is finished even if an earlier one fails.
    fn finish(&mut self) -> Result<()> {
        let mut first_error = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.finish() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Collects records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub records: Vec<FailureRecord>,
    pub malformed: Vec<MalformedRow>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorSink for MemorySink {
    fn emit(&mut self, record: &FailureRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn emit_malformed(&mut self, row: &MalformedRow) -> Result<()> {
        self.malformed.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

#[derive(Serialize)]
struct CsvLine<'a> {
    row: u64,
    column: &'a str,
    test: &'a str,
    category: &'a str,
    value: &'a str,
    message: &'a str,
}

/// Writes records as CSV with a `row,column,test,category,value,message`
/// header. The header is written with the first record, so a run without
/// failures leaves the output empty.
pub struct CsvErrorSink<W: Write> {
    writer: csv::Writer<W>,
    written: u64,
}

impl CsvErrorSink<File> {
    /// Creates (or truncates) `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ProfilerError::io(path, e))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvErrorSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(true).from_writer(writer),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Returns the underlying writer, flushing first.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ProfilerError::Sink(e.to_string()))
    }
}

impl<W: Write> ErrorSink for CsvErrorSink<W> {
    fn emit(&mut self, record: &FailureRecord) -> Result<()> {
        self.writer.serialize(CsvLine {
            row: record.row,
            column: &record.column,
            test: &record.test,
            category: record.category.label(),
            value: &record.value,
            message: &record.message,
        })?;
        self.written += 1;
        Ok(())
    }

    fn emit_malformed(&mut self, row: &MalformedRow) -> Result<()> {
        let value = row.fields.join("|");
        self.writer.serialize(CsvLine {
            row: row.row,
            column: "",
            test: "field count",
            category: "malformed",
            value: &value,
            message: &row.message(),
        })?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ProfilerError::Sink(e.to_string()))
    }
}

/// Writes tab-separated text lines, one per record.
///
/// Lines start with the configured key column's value when there is one,
/// otherwise with the row number.
pub struct LogSink<W: Write> {
    out: BufWriter<W>,
    path: Option<PathBuf>,
    written: u64,
}

impl LogSink<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ProfilerError::io(path, e))?;
        let mut sink = Self::new(file);
        sink.path = Some(path.to_path_buf());
        Ok(sink)
    }
}

impl<W: Write> LogSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
            path: None,
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| ProfilerError::Sink(e.to_string()))
    }

    fn io_error(&self, e: std::io::Error) -> ProfilerError {
        match &self.path {
            Some(path) => ProfilerError::io(path, e),
            None => ProfilerError::Sink(e.to_string()),
        }
    }
}

impl<W: Write> ErrorSink for LogSink<W> {
    fn emit(&mut self, record: &FailureRecord) -> Result<()> {
        let lead = match &record.key {
            Some(key) => key.clone(),
            None => format!("row {}", record.row),
        };
        writeln!(
            self.out,
            "{lead}\t{}\t{}\t({})\t{}\t{}",
            record.column, record.test, record.category, record.message, record.value
        )
        .map_err(|e| self.io_error(e))?;
        self.written += 1;
        Ok(())
    }

    fn emit_malformed(&mut self, row: &MalformedRow) -> Result<()> {
        writeln!(self.out, "row {}\t(malformed)\t{}", row.row, row.message())
            .map_err(|e| self.io_error(e))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ErrorCategory;

    fn record(row: u64, key: Option<&str>) -> FailureRecord {
        FailureRecord {
            row,
            column: "State".into(),
            test: "xref_territory".into(),
            category: ErrorCategory::CrossReference,
            value: "FL".into(),
            message: "value not allowed".into(),
            key: key.map(str::to_string),
        }
    }

    #[test]
    fn test_csv_sink_writes_header_with_first_record() {
        let mut sink = CsvErrorSink::new(Vec::new());
        sink.finish().unwrap();
        assert!(sink.into_inner().unwrap().is_empty());

        let mut sink = CsvErrorSink::new(Vec::new());
        sink.emit(&record(4, None)).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 1);
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "row,column,test,category,value,message\n4,State,xref_territory,xref,FL,value not allowed\n"
        );
    }

    #[test]
    fn test_log_sink_uses_key_or_row() {
        let mut sink = LogSink::new(Vec::new());
        sink.emit(&record(4, Some("K-104"))).unwrap();
        sink.emit(&record(5, None)).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("K-104\tState\txref_territory\t(xref)"));
        assert!(lines[1].starts_with("row 5\t"));
    }

    #[test]
    fn test_fan_out_reaches_every_sink() {
        let mut sinks = vec![MemorySink::new(), MemorySink::new()];
        sinks.emit(&record(1, None)).unwrap();
        sinks.finish().unwrap();
        assert!(sinks.iter().all(|s| s.records.len() == 1 && s.finished));
    }

    #[test]
    fn test_malformed_notice_in_csv() {
        let mut sink = CsvErrorSink::new(Vec::new());
        sink.emit_malformed(&MalformedRow {
            row: 9,
            expected: 3,
            found: 2,
            fields: vec!["a".into(), "b".into()],
        })
        .unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert!(text.contains("9,,field count,malformed,a|b,\"row has 2 fields, expected 3\""));
    }
}
