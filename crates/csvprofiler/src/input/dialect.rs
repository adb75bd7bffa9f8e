//! CSV dialect settings and delimiter detection.

use std::io::{BufRead, BufReader};

use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Lines sampled by [`detect_delimiter`].
const DETECT_LINES: usize = 10;

/// How the input file is delimited and quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Field delimiter. Detected from the file when unset.
    pub delimiter: Option<char>,
    pub quote: char,
    /// Escape character inside quoted fields, if any.
    pub escape: Option<char>,
    /// Whether `""` inside a quoted field is a literal quote.
    pub double_quote: bool,
    /// Whether the first row names the columns.
    pub has_header: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: '"',
            escape: None,
            double_quote: true,
            has_header: true,
        }
    }
}

impl Dialect {
    /// Dialect with a fixed delimiter.
    pub fn delimited(delimiter: char) -> Self {
        Self {
            delimiter: Some(delimiter),
            ..Self::default()
        }
    }

    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    /// Rejects characters the CSV reader cannot use.
    pub fn validate(&self) -> Result<()> {
        if let Some(d) = self.delimiter {
            ascii_byte("delimiter", d)?;
        }
        ascii_byte("quote", self.quote)?;
        if let Some(e) = self.escape {
            ascii_byte("escape", e)?;
        }
        Ok(())
    }

    /// Builds a reader configured for this dialect and the given delimiter.
    ///
    /// The reader is flexible: rows with the wrong number of fields are
    /// returned as-is so the engine can treat them as malformed.
    pub fn reader_builder(&self, delimiter: u8) -> Result<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(delimiter)
            .quote(ascii_byte("quote", self.quote)?)
            .double_quote(self.double_quote)
            .escape(self.escape.map(|e| ascii_byte("escape", e)).transpose()?)
            .has_headers(self.has_header)
            .flexible(true);
        Ok(builder)
    }

    /// The configured delimiter, or the one detected from `sample`.
    pub fn resolve_delimiter(&self, sample: &[u8]) -> Result<u8> {
        match self.delimiter {
            Some(d) => ascii_byte("delimiter", d),
            None => Ok(detect_delimiter(sample)),
        }
    }
}

fn ascii_byte(what: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(ProfilerError::config(format!(
            "{what} must be a single ASCII character, got '{c}'"
        )))
    }
}

/// Guesses the delimiter from the first lines of a file.
///
/// A delimiter that appears the same number of times on every line wins;
/// ties go to the higher count. Falls back to a comma.
pub fn detect_delimiter(bytes: &[u8]) -> u8 {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(DETECT_LINES)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    best_delimiter
}

/// Count delimiter occurrences in a line, outside quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6"), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3\n4\t5\t6"), b'\t');
    }

    #[test]
    fn test_detect_ignores_quoted_delimiters() {
        assert_eq!(detect_delimiter(b"a|\"b,c\"\n1|\"2,3\""), b'|');
    }

    #[test]
    fn test_detect_empty_falls_back_to_comma() {
        assert_eq!(detect_delimiter(b""), b',');
    }

    #[test]
    fn test_dialect_json_defaults() {
        let dialect: Dialect = serde_json::from_str(r#"{"delimiter": ";"}"#).unwrap();
        assert_eq!(dialect.delimiter, Some(';'));
        assert!(dialect.has_header);
        assert_eq!(dialect.quote, '"');
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let dialect = Dialect::delimited('§');
        assert!(dialect.validate().unwrap_err().is_config_error());
    }
}
