//! Param template generation from a sample of an input file.
//!
//! Every built-in test is run against every sampled field. Each column gets
//! the test that matched most often, falling back to `ASCII`, and an exact
//! `Column Length` when every sampled value had the same length.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{ProfilerError, Result};
use crate::input::{CsvRowSupplier, Dialect, RowSupplier};
use crate::profiler::ProfilerConfig;
use crate::registry::{builtin_matches, catalogue};
use crate::schema::{ColumnDefinition, ErrorCategory, Limit, NamedTest, TestKind, write_params};

/// Rows sampled by default.
pub const SAMPLE_ROWS: usize = 997;

/// Format error limit written into generated templates.
pub const TEMPLATE_ERROR_LIMIT: u64 = 50;

/// What the sample suggests for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRecommendation {
    pub name: String,
    pub test: TestKind,
    /// Sampled values that passed `test`.
    pub matches: usize,
    /// Set when every sampled value had this length.
    pub length: Option<usize>,
}

/// Result of analysing a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub columns: Vec<ColumnRecommendation>,
    pub rows_sampled: usize,
    /// Rows skipped for having the wrong number of fields.
    pub rows_skipped: usize,
}

/// Files written by [`Template::write_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFiles {
    pub param_file: PathBuf,
    pub config_file: PathBuf,
}

impl Template {
    /// Column definitions as the template would write them.
    pub fn definitions(&self) -> Vec<ColumnDefinition> {
        self.columns
            .iter()
            .enumerate()
            .map(|(position, rec)| {
                ColumnDefinition::new(rec.name.clone(), position)
                    .with_test(rec.test.clone())
                    .with_length(rec.length, rec.length)
                    .with_strip(true)
                    .with_limit(ErrorCategory::Format, Limit::Max(TEMPLATE_ERROR_LIMIT))
            })
            .collect()
    }

    pub fn write_params<W: Write>(&self, writer: W) -> Result<()> {
        write_params(&self.definitions(), writer)
    }

    /// Writes `<root>_csvp_params_<timestamp>.csv` and `<root>_csvp.json`
    /// into `output_dir`, where `<root>` is the input file's stem.
    pub fn write_files(
        &self,
        input: &Path,
        dialect: &Dialect,
        output_dir: &Path,
    ) -> Result<TemplateFiles> {
        let root = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        let stamp = Utc::now().format("%Y%m%d%H%M%S");

        let param_file = output_dir.join(format!("{root}_csvp_params_{stamp}.csv"));
        let file = File::create(&param_file).map_err(|e| ProfilerError::io(&param_file, e))?;
        self.write_params(file)?;

        let mut config = ProfilerConfig::new(
            input.to_path_buf(),
            param_file.file_name().map(PathBuf::from).unwrap_or_default(),
            format!("{root}_csvp_report.txt"),
        );
        config.error_csv_file = Some(format!("{root}_csvp_errors.csv").into());
        config.error_log_file = Some(format!("{root}_csvp_errors.log").into());
        config.dialect = dialect.clone();
        config.key_column = 1;
        config.error_row_limit = Some(100);

        let config_file = output_dir.join(format!("{root}_csvp.json"));
        config.save(&config_file)?;
        debug!(params = %param_file.display(), config = %config_file.display(), "Template written");

        Ok(TemplateFiles {
            param_file,
            config_file,
        })
    }
}

/// Builds param templates from sample data.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    sample_rows: usize,
    dialect: Dialect,
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self {
            sample_rows: SAMPLE_ROWS,
            dialect: Dialect::default(),
        }
    }
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = rows;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Samples a file. Column names come from the header, or are
    /// `Column1..N` without one.
    pub fn analyze_file(&self, path: &Path) -> Result<Template> {
        let (supplier, source) = CsvRowSupplier::open(path, &self.dialect)?;
        debug!(file = %source.file, format = source.format(), "Sampling input");
        let header = supplier.header().map(<[String]>::to_vec);
        self.analyze(header, supplier)
    }

    /// Samples rows from any supplier.
    pub fn analyze<S: RowSupplier>(
        &self,
        header: Option<Vec<String>>,
        mut supplier: S,
    ) -> Result<Template> {
        let mut rows = Vec::new();
        let mut first = None;
        let width = match &header {
            Some(names) => names.len(),
            None => match supplier.next_row()? {
                Some(row) => {
                    let width = row.len();
                    first = Some(row);
                    width
                }
                None => 0,
            },
        };
        if width == 0 {
            return Err(ProfilerError::config("input has no columns to sample"));
        }

        let mut skipped = 0;
        let mut next = first;
        while rows.len() < self.sample_rows {
            let row = match next.take() {
                Some(row) => row,
                None => match supplier.next_row()? {
                    Some(row) => row,
                    None => break,
                },
            };
            if row.len() == width {
                rows.push(row);
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!(skipped, "Sample rows with the wrong number of fields were skipped");
        }

        let names = unique_names(header.unwrap_or_else(|| {
            (1..=width).map(|i| format!("Column{i}")).collect()
        }));
        let tests = catalogue();
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| recommend(name, &tests, rows.iter().map(|r| r[index].trim())))
            .collect();

        Ok(Template {
            columns,
            rows_sampled: rows.len(),
            rows_skipped: skipped,
        })
    }
}

/// Picks the test with the most matches. Ties go to the earlier test.
fn recommend<'a>(
    name: String,
    tests: &[TestKind],
    values: impl Iterator<Item = &'a str>,
) -> ColumnRecommendation {
    let mut counts = vec![0usize; tests.len()];
    let mut length: Option<Option<usize>> = None;

    for value in values {
        let len = value.chars().count();
        length = match length {
            None => Some(Some(len)),
            Some(Some(l)) if l == len => Some(Some(l)),
            _ => Some(None),
        };
        if value.is_empty() {
            continue;
        }
        for (count, test) in counts.iter_mut().zip(tests) {
            if builtin_matches(test, value).unwrap_or(false) {
                *count += 1;
            }
        }
    }

    let mut best = None;
    let mut best_count = 0;
    for (count, test) in counts.iter().zip(tests) {
        if *count > best_count {
            best_count = *count;
            best = Some(test);
        }
    }

    ColumnRecommendation {
        name,
        test: best.cloned().unwrap_or(TestKind::Named {
            test: NamedTest::Ascii,
        }),
        matches: best_count,
        length: length.flatten().filter(|&l| l > 0),
    }
}

/// Makes duplicate header names unique by appending `($n)`.
fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let name = if name.trim().is_empty() {
            format!("Column{}", out.len() + 1)
        } else {
            name.trim().to_string()
        };
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            out.push(name);
        } else {
            warn!(name = %name, "Renaming duplicate header name");
            out.push(format!("{name}(${count})"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::rows_from;
    use crate::schema::parse_params;

    fn sample() -> Template {
        let rows: Vec<&[&str]> = vec![
            &["1001", "Ann", "NY", "ann@example.com"],
            &["1002", "Bob", "PA", "bob@example.org"],
            &["1003", "Cy", "NJ", ""],
            &["1004"],
        ];
        let header = ["Id", "Name", "State", "Email"].map(String::from).to_vec();
        TemplateGenerator::new()
            .analyze(Some(header), rows_from(rows))
            .unwrap()
    }

    #[test]
    fn test_recommendations() {
        let template = sample();
        assert_eq!(template.rows_sampled, 3);
        assert_eq!(template.rows_skipped, 1);

        let id = &template.columns[0];
        assert_eq!(id.test, TestKind::Digit);
        assert_eq!(id.length, Some(4));

        let name = &template.columns[1];
        assert_eq!(name.test, TestKind::Alpha);
        assert_eq!(name.length, None);

        assert_eq!(template.columns[2].length, Some(2));
        assert_eq!(
            template.columns[3].test,
            TestKind::Named {
                test: NamedTest::Email
            }
        );
    }

    #[test]
    fn test_sample_limit() {
        let rows: Vec<Vec<String>> = (0..50).map(|i| vec![i.to_string()]).collect();
        let template = TemplateGenerator::new()
            .with_sample_rows(10)
            .analyze(Some(vec!["n".into()]), crate::input::IterSupplier::new(rows))
            .unwrap();
        assert_eq!(template.rows_sampled, 10);
    }

    #[test]
    fn test_fallback_is_ascii() {
        let rec = recommend("x".into(), &catalogue(), ["", ""].into_iter());
        assert_eq!(
            rec.test,
            TestKind::Named {
                test: NamedTest::Ascii
            }
        );
        assert_eq!(rec.length, None);
    }

    #[test]
    fn test_generated_params_parse() {
        let mut out = Vec::new();
        sample().write_params(&mut out).unwrap();
        let set = parse_params(out.as_slice()).unwrap();
        let id = set.get("Id").unwrap();
        assert_eq!(id.test, TestKind::Digit);
        assert_eq!(id.min_length, Some(4));
        assert!(id.strip);
        assert_eq!(
            id.error_limits.get(ErrorCategory::Format),
            Limit::Max(TEMPLATE_ERROR_LIMIT)
        );
    }

    #[test]
    fn test_headerless_names_and_duplicates() {
        let rows: Vec<&[&str]> = vec![&["a", "b"], &["c", "d"]];
        let template = TemplateGenerator::new().analyze(None, rows_from(rows)).unwrap();
        assert_eq!(template.rows_sampled, 2);
        assert_eq!(template.columns[0].name, "Column1");

        let names = unique_names(vec!["a".into(), "a".into(), " ".into()]);
        assert_eq!(names, vec!["a", "a($2)", "Column3"]);
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("orders.csv");
        let files = sample()
            .write_files(&input, &Dialect::default(), dir.path())
            .unwrap();
        assert!(files.param_file.exists());
        let config = ProfilerConfig::load(&files.config_file).unwrap();
        assert_eq!(config.csv_file, input);
        assert_eq!(config.param_file, files.param_file);
        assert_eq!(config.key_column, 1);
    }
}
