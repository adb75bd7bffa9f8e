//! Param file reading and writing.
//!
//! A param file is a CSV grid laid out column-per-column: the first cell of
//! every row is a row tag and the remaining cells hold one value per input
//! column. Rows from `User Data` onwards are all user data.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{ProfilerError, Result};

use super::column::ColumnDefinition;
use super::table::ColumnSet;
use super::types::{ErrorCategory, Limit, ProfileMode, TestKind};

pub const TAG_OPTIONS: &str = "csvp_options";
pub const TAG_TEST: &str = "Column Test";
pub const TAG_LENGTH: &str = "Column Length";
pub const TAG_MIN_LENGTH: &str = "Min Length";
pub const TAG_MAX_LENGTH: &str = "Max Length";
pub const TAG_PROFILE: &str = "Profile (y/n/p/u/s)";
pub const TAG_BLANK_IS_ERROR: &str = "Blank is Error (y/n)";
pub const TAG_STRIP: &str = "Strip Surrounding Spaces (y/n)";
pub const TAG_LIMIT: &str = "Error Output Limit";
pub const TAG_LIMIT_LENGTH: &str = "Error Output Limit - Length Errors";
pub const TAG_LIMIT_BLANK: &str = "Error Output Limit - Blank Errors";
pub const TAG_LIMIT_XREF: &str = "Error Output Limit - Cross Reference Errors";
pub const TAG_LIMIT_CUSTOM: &str = "Error Output Limit - Custom Errors";
pub const TAG_USER_DATA: &str = "User Data";

/// Param files larger than this are rejected before parsing.
const MAX_PARAM_FILE_BYTES: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowTag {
    Test,
    Length,
    MinLength,
    MaxLength,
    Profile,
    BlankIsError,
    Strip,
    Limit,
    LimitLength,
    LimitBlank,
    LimitXref,
    LimitCustom,
}

impl RowTag {
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            TAG_TEST => RowTag::Test,
            TAG_LENGTH => RowTag::Length,
            TAG_MIN_LENGTH => RowTag::MinLength,
            TAG_MAX_LENGTH => RowTag::MaxLength,
            TAG_PROFILE => RowTag::Profile,
            TAG_BLANK_IS_ERROR => RowTag::BlankIsError,
            TAG_STRIP => RowTag::Strip,
            TAG_LIMIT => RowTag::Limit,
            TAG_LIMIT_LENGTH => RowTag::LimitLength,
            TAG_LIMIT_BLANK => RowTag::LimitBlank,
            TAG_LIMIT_XREF => RowTag::LimitXref,
            TAG_LIMIT_CUSTOM => RowTag::LimitCustom,
            _ => return None,
        })
    }
}

/// Tagged rows gathered before any column is built.
#[derive(Debug, Default)]
struct Grid {
    names: Vec<String>,
    rows: Vec<(RowTag, Vec<String>)>,
    user_data: Vec<Vec<String>>,
}

impl Grid {
    fn row(&self, tag: RowTag) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, cells)| cells.as_slice())
    }

    fn cell(&self, tag: RowTag, column: usize) -> &str {
        self.row(tag)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// User data cells for a column, up to the first blank.
    fn user_data_for(&self, column: usize) -> Vec<String> {
        self.user_data
            .iter()
            .map(|row| row.get(column).map(String::as_str).unwrap_or(""))
            .take_while(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Reads a param file from disk.
pub fn read_param_file(path: &Path) -> Result<ColumnSet> {
    let size = std::fs::metadata(path)
        .map_err(|e| ProfilerError::io(path, e))?
        .len();
    if size > MAX_PARAM_FILE_BYTES {
        return Err(ProfilerError::config(format!(
            "'{}' is too large to be a param file ({size} bytes)",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|e| ProfilerError::io(path, e))?;
    let columns = parse_params(file)?;
    debug!(path = %path.display(), columns = columns.len(), "Loaded param file");
    Ok(columns)
}

/// Parses param file content into a validated column set.
///
/// Nothing is returned unless every column parses.
pub fn parse_params<R: Read>(reader: R) -> Result<ColumnSet> {
    let grid = read_grid(reader)?;
    let width = grid.names.len();

    let mut columns = Vec::with_capacity(width);
    for (i, name) in grid.names.iter().enumerate() {
        let context = |e: ProfilerError| match e {
            ProfilerError::Config(msg) => {
                ProfilerError::config(format!("column #{} '{name}': {msg}", i + 1))
            }
            other => other,
        };
        columns.push(build_column(&grid, i, name).map_err(context)?);
    }

    ColumnSet::new(columns)
}

fn read_grid<R: Read>(reader: R) -> Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Grid::default();
    let mut header_seen = false;
    let mut in_user_data = false;

    for record in csv_reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        let tag = cells[0].as_str();
        let values: Vec<String> = cells.iter().skip(1).cloned().collect();

        if !header_seen {
            if tag != TAG_OPTIONS {
                return Err(ProfilerError::config(format!(
                    "param file must start with a '{TAG_OPTIONS}' row, found '{tag}'"
                )));
            }
            grid.names = header_names(values)?;
            header_seen = true;
            continue;
        }

        if in_user_data || tag == TAG_USER_DATA {
            in_user_data = true;
            grid.user_data.push(values);
            continue;
        }

        let row_tag = RowTag::from_tag(tag)
            .ok_or_else(|| ProfilerError::config(format!("unknown param row tag '{tag}'")))?;
        if grid.row(row_tag).is_some() {
            return Err(ProfilerError::config(format!(
                "param row '{tag}' appears more than once"
            )));
        }
        if values.len() > grid.names.len() && values[grid.names.len()..].iter().any(|v| !v.is_empty()) {
            return Err(ProfilerError::config(format!(
                "param row '{tag}' has more values than there are columns"
            )));
        }
        grid.rows.push((row_tag, values));
    }

    if !header_seen {
        return Err(ProfilerError::config("param file is empty"));
    }
    if grid.row(RowTag::Test).is_none() {
        return Err(ProfilerError::config(format!(
            "param file has no '{TAG_TEST}' row"
        )));
    }
    Ok(grid)
}

fn header_names(mut names: Vec<String>) -> Result<Vec<String>> {
    while names.last().is_some_and(|n| n.is_empty()) {
        names.pop();
    }
    if names.is_empty() {
        return Err(ProfilerError::config("param file declares no columns"));
    }
    if let Some(i) = names.iter().position(|n| n.is_empty()) {
        return Err(ProfilerError::config(format!(
            "blank column name at position {} in param file",
            i + 1
        )));
    }
    Ok(names)
}

fn build_column(grid: &Grid, i: usize, name: &str) -> Result<ColumnDefinition> {
    let user_data = grid.user_data_for(i);
    let test = TestKind::parse(grid.cell(RowTag::Test, i), &user_data)?;

    let mut min_length = None;
    let mut max_length = None;
    if let Some(exact) = parse_length(grid.cell(RowTag::Length, i))? {
        min_length = Some(exact);
        max_length = Some(exact);
    }
    if let Some(min) = parse_length(grid.cell(RowTag::MinLength, i))? {
        min_length = Some(min);
    }
    if let Some(max) = parse_length(grid.cell(RowTag::MaxLength, i))? {
        max_length = Some(max);
    }

    let main_limit = Limit::parse(grid.cell(RowTag::Limit, i))?;
    let override_or_main = |tag: RowTag| -> Result<Limit> {
        if grid.cell(tag, i).is_empty() {
            Ok(main_limit)
        } else {
            Limit::parse(grid.cell(tag, i))
        }
    };

    Ok(ColumnDefinition::new(name, i)
        .with_test(test)
        .with_length(min_length, max_length)
        .with_profile(ProfileMode::parse(grid.cell(RowTag::Profile, i))?)
        .with_blank_is_error(flag(grid.cell(RowTag::BlankIsError, i)))
        .with_strip(flag(grid.cell(RowTag::Strip, i)))
        .with_limit(ErrorCategory::Format, main_limit)
        .with_limit(
            ErrorCategory::Length,
            Limit::parse(grid.cell(RowTag::LimitLength, i))?,
        )
        .with_limit(
            ErrorCategory::Blank,
            Limit::parse(grid.cell(RowTag::LimitBlank, i))?,
        )
        .with_limit(ErrorCategory::CrossReference, override_or_main(RowTag::LimitXref)?)
        .with_limit(ErrorCategory::Custom, override_or_main(RowTag::LimitCustom)?)
        .with_user_data(user_data))
}

/// Blank or `0` means no bound.
fn parse_length(cell: &str) -> Result<Option<usize>> {
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ProfilerError::config(format!(
            "invalid length specification '{cell}'"
        ))),
    }
}

/// `y`/`Y`/`t`/`T` prefixes are true.
fn flag(cell: &str) -> bool {
    matches!(cell.chars().next(), Some('y' | 'Y' | 't' | 'T'))
}

fn limit_cell(limit: Limit) -> String {
    match limit {
        Limit::Unlimited => String::new(),
        Limit::Suppressed => "0".to_string(),
        Limit::Max(n) => n.to_string(),
    }
}

fn yes_no(value: bool) -> String {
    if value { "y" } else { "n" }.to_string()
}

/// Writes column definitions back out in param file layout.
pub fn write_params<W: Write>(columns: &[ColumnDefinition], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let row = |tag: &str, cell: &dyn Fn(&ColumnDefinition) -> String| -> Vec<String> {
        std::iter::once(tag.to_string())
            .chain(columns.iter().map(cell))
            .collect()
    };
    let exact = |c: &ColumnDefinition| match (c.min_length, c.max_length) {
        (Some(min), Some(max)) if min == max => Some(min),
        _ => None,
    };
    let bound = |c: &ColumnDefinition, value: Option<usize>| {
        if exact(c).is_some() {
            String::new()
        } else {
            value.map(|v| v.to_string()).unwrap_or_default()
        }
    };
    let profile = |c: &ColumnDefinition| {
        match c.profile {
            ProfileMode::Off => "n",
            ProfileMode::Occurrence => "y",
            ProfileMode::Unique => "u",
            ProfileMode::Statistical => "s",
        }
        .to_string()
    };

    out.write_record(row(TAG_OPTIONS, &|c| c.name.clone()))?;
    out.write_record(row(TAG_TEST, &|c| c.test.to_string()))?;
    out.write_record(row(TAG_LENGTH, &|c| {
        exact(c).map(|v| v.to_string()).unwrap_or_default()
    }))?;
    out.write_record(row(TAG_MIN_LENGTH, &|c| bound(c, c.min_length)))?;
    out.write_record(row(TAG_MAX_LENGTH, &|c| bound(c, c.max_length)))?;
    out.write_record(row(TAG_PROFILE, &profile))?;
    out.write_record(row(TAG_BLANK_IS_ERROR, &|c| yes_no(c.blank_is_error)))?;
    out.write_record(row(TAG_STRIP, &|c| yes_no(c.strip)))?;
    out.write_record(row(TAG_LIMIT, &|c| {
        limit_cell(c.error_limits.get(ErrorCategory::Format))
    }))?;
    out.write_record(row(TAG_LIMIT_LENGTH, &|c| {
        limit_cell(c.error_limits.get(ErrorCategory::Length))
    }))?;
    out.write_record(row(TAG_LIMIT_BLANK, &|c| {
        limit_cell(c.error_limits.get(ErrorCategory::Blank))
    }))?;

    let depth = columns.iter().map(|c| c.user_data.len()).max().unwrap_or(0).max(1);
    for line in 0..depth {
        let tag = if line == 0 { TAG_USER_DATA } else { "" };
        out.write_record(row(tag, &|c| {
            c.user_data.get(line).cloned().unwrap_or_default()
        }))?;
    }

    out.flush().map_err(|e| ProfilerError::io("param file", e))?;
    Ok(())
}
