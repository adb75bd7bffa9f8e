//! Metadata about the file being profiled.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ProfilerError, Result};

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Delimiter used to read the file.
    pub delimiter: char,
    /// When the file was inspected.
    pub inspected_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Hashes `path` and records its size.
    pub fn inspect(path: &Path, delimiter: u8) -> Result<Self> {
        let file = File::open(path).map_err(|e| ProfilerError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| ProfilerError::io(path, e))?
            .len();

        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf).map_err(|e| ProfilerError::io(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes,
            delimiter: delimiter as char,
            inspected_at: Utc::now(),
        })
    }

    /// Human-readable delimiter name.
    pub fn format(&self) -> &'static str {
        match self.delimiter {
            '\t' => "tsv",
            ',' => "csv",
            ';' => "csv-semicolon",
            '|' => "psv",
            _ => "delimited",
        }
    }
}
