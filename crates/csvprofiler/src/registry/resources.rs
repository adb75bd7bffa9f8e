//! Loading lookup lists, patterns and cross-reference rule tables.

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ProfilerError, Result};
use crate::xref::CrossReferenceRuleTable;

/// Supplies the external resources named by column tests.
///
/// Each method is called at most once per name per run.
pub trait ResourceLoader {
    /// Values of a lookup list. `name` keeps its prefix (`lookup_states`).
    fn load_lookup(&self, name: &str) -> Result<Vec<String>>;

    /// Pattern text. `name` keeps its prefix (`regex_zip`).
    fn load_pattern(&self, name: &str) -> Result<String>;

    /// Rule table for `xref_<name>`.
    fn load_rule_table(&self, name: &str) -> Result<CrossReferenceRuleTable>;
}

/// Resources read from a directory.
///
/// Lookups and patterns come from `<dir>/<name>.txt` (`lookup_states.txt`,
/// `regex_zip.txt`), rule tables from `<dir>/<table>.csv`. Individual names
/// can be pointed at other files.
#[derive(Debug, Clone)]
pub struct FileResources {
    dir: PathBuf,
    overrides: HashMap<String, PathBuf>,
}

impl FileResources {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Load `name` from `path` instead of the directory default.
    pub fn with_override(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(name.into(), path.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str, extension: &str) -> PathBuf {
        self.overrides
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.dir.join(format!("{name}.{extension}")))
    }

    fn read_text(&self, name: &str, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| {
            ProfilerError::resource(name, format!("cannot read '{}': {e}", path.display()))
        })?;
        debug!(resource = name, path = %path.display(), bytes = bytes.len(), "Loaded resource");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl ResourceLoader for FileResources {
    /// One value per line, right-trimmed. Blank lines are skipped.
    fn load_lookup(&self, name: &str) -> Result<Vec<String>> {
        let path = self.path_for(name, "txt");
        let text = self.read_text(name, &path)?;
        Ok(text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Lines are joined with a space, so long patterns can be wrapped.
    fn load_pattern(&self, name: &str) -> Result<String> {
        let path = self.path_for(name, "txt");
        let text = self.read_text(name, &path)?;
        let pattern = text
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if pattern.is_empty() {
            return Err(ProfilerError::resource(
                name,
                format!("pattern file '{}' is empty", path.display()),
            ));
        }
        Ok(pattern)
    }

    fn load_rule_table(&self, name: &str) -> Result<CrossReferenceRuleTable> {
        let path = self.path_for(name, "csv");
        let file = File::open(&path).map_err(|e| {
            ProfilerError::resource(name, format!("cannot read '{}': {e}", path.display()))
        })?;
        let table = CrossReferenceRuleTable::from_reader(name, file)?;
        debug!(resource = name, path = %path.display(), keys = table.len(), "Loaded rule table");
        Ok(table)
    }
}

/// Resources held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResources {
    lookups: HashMap<String, Vec<String>>,
    patterns: HashMap<String, String>,
    tables: HashMap<String, CrossReferenceRuleTable>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lookups
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_pattern(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.patterns.insert(name.into(), pattern.into());
        self
    }

    pub fn with_rule_table(mut self, table: CrossReferenceRuleTable) -> Self {
        self.tables.insert(table.name().to_string(), table);
        self
    }
}

impl ResourceLoader for InMemoryResources {
    fn load_lookup(&self, name: &str) -> Result<Vec<String>> {
        self.lookups
            .get(name)
            .cloned()
            .ok_or_else(|| ProfilerError::resource(name, "no such lookup list"))
    }

    fn load_pattern(&self, name: &str) -> Result<String> {
        self.patterns
            .get(name)
            .cloned()
            .ok_or_else(|| ProfilerError::resource(name, "no such pattern"))
    }

    fn load_rule_table(&self, name: &str) -> Result<CrossReferenceRuleTable> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| ProfilerError::resource(name, "no such rule table"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) -> PathBuf {
        let path = dir.join(file);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_file_lookup_trims_and_skips_blanks() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "states.txt", "NY  \nPA\n\nFL\r\n");
        let loader = FileResources::new(dir.path());
        assert_eq!(loader.load_lookup("states").unwrap(), vec!["NY", "PA", "FL"]);
    }

    #[test]
    fn test_file_pattern_joins_lines() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "code.txt", "  [A-Z]{2}\n-[0-9]{3}  \n");
        let loader = FileResources::new(dir.path());
        assert_eq!(loader.load_pattern("code").unwrap(), "[A-Z]{2} -[0-9]{3}");
    }

    #[test]
    fn test_override_path() {
        let dir = TempDir::new().unwrap();
        let other = write(dir.path(), "elsewhere.list", "a\nb\n");
        let loader = FileResources::new("/nonexistent").with_override("letters", other);
        assert_eq!(loader.load_lookup("letters").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let dir = TempDir::new().unwrap();
        let loader = FileResources::new(dir.path());
        let err = loader.load_lookup("absent").unwrap_err();
        assert!(matches!(err, ProfilerError::ExternalResource { ref name, .. } if name == "absent"));
        assert!(err.is_config_error());
        assert!(loader.load_rule_table("absent").is_err());
    }

    #[test]
    fn test_file_rule_table() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "territory.csv",
            "key,column,allowed\nFinance,State,NY|PA\n",
        );
        let table = FileResources::new(dir.path())
            .load_rule_table("territory")
            .unwrap();
        assert_eq!(table.name(), "territory");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_in_memory_resources() {
        let loader = InMemoryResources::new()
            .with_lookup("colors", ["red", "green"])
            .with_pattern("code", "[A-Z]+");
        assert_eq!(loader.load_lookup("colors").unwrap().len(), 2);
        assert_eq!(loader.load_pattern("code").unwrap(), "[A-Z]+");
        assert!(loader.load_rule_table("x").is_err());
    }
}
