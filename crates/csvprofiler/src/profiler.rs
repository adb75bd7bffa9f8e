//! Run configuration and the top-level driver.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{Engine, EngineOptions, MalformedRowPolicy, RunOutcome};
use crate::error::{ProfilerError, Result};
use crate::input::{CsvRowSupplier, Dialect};
use crate::registry::{CustomRegistry, FileResources};
use crate::reporter::{CsvErrorSink, ErrorSink, LogSink};
use crate::schema::{Limit, read_param_file};

/// A JSON run configuration.
///
/// Relative paths are resolved against the directory of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilerConfig {
    pub csv_file: PathBuf,
    pub param_file: PathBuf,
    pub report_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_csv_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_log_file: Option<PathBuf>,
    /// Where `<name>.txt` and `<name>.csv` resources live. Defaults to the
    /// param file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_dir: Option<PathBuf>,
    /// Resource name to file, for resources not in `resource_dir`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, PathBuf>,
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,
    /// Maximum rows that may write failure records. Unset is unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_row_limit: Option<u64>,
    /// 1-based column whose value labels error log lines; 0 uses the row number.
    #[serde(default)]
    pub key_column: usize,
}

impl ProfilerConfig {
    pub fn new(
        csv_file: impl Into<PathBuf>,
        param_file: impl Into<PathBuf>,
        report_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            csv_file: csv_file.into(),
            param_file: param_file.into(),
            report_file: report_file.into(),
            error_csv_file: None,
            error_log_file: None,
            resource_dir: None,
            resources: IndexMap::new(),
            dialect: Dialect::default(),
            malformed_rows: MalformedRowPolicy::default(),
            error_row_limit: None,
            key_column: 0,
        }
    }

    /// Reads a config file and resolves its paths.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ProfilerError::io(path, e))?;
        let mut config: ProfilerConfig = serde_json::from_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        config.validate()?;
        debug!(path = %path.display(), "Loaded run configuration");
        Ok(config)
    }

    /// Writes the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| ProfilerError::io(path, e))
    }

    /// Makes every relative path relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.csv_file);
        resolve(&mut self.param_file);
        resolve(&mut self.report_file);
        for path in [
            &mut self.error_csv_file,
            &mut self.error_log_file,
            &mut self.resource_dir,
        ]
        .into_iter()
        .flatten()
        {
            resolve(path);
        }
        for path in self.resources.values_mut() {
            resolve(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.dialect.validate()?;
        let outputs = [
            Some(&self.report_file),
            self.error_csv_file.as_ref(),
            self.error_log_file.as_ref(),
        ];
        for output in outputs.into_iter().flatten() {
            if output == &self.csv_file || output == &self.param_file {
                return Err(ProfilerError::config(format!(
                    "output file '{}' would overwrite an input file",
                    output.display()
                )));
            }
        }
        Ok(())
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            malformed_rows: self.malformed_rows,
            error_row_limit: match self.error_row_limit {
                None => Limit::Unlimited,
                Some(0) => Limit::Suppressed,
                Some(n) => Limit::Max(n),
            },
            key_column: self.key_column.checked_sub(1),
            ..EngineOptions::default()
        }
    }

    pub fn resource_loader(&self) -> FileResources {
        let dir = self.resource_dir.clone().unwrap_or_else(|| {
            self.param_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        });
        self.resources
            .iter()
            .fold(FileResources::new(dir), |loader, (name, path)| {
                loader.with_override(name.clone(), path.clone())
            })
    }
}

/// Wires a config to the engine: reads the param file, opens the input and
/// the error outputs, runs, and writes the report.
pub struct Profiler {
    config: ProfilerConfig,
    custom: CustomRegistry,
}

impl Profiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self {
            config,
            custom: CustomRegistry::new(),
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self> {
        Ok(Self::new(ProfilerConfig::load(path)?))
    }

    /// Functions available to `custom_<name>` tests.
    pub fn with_custom(mut self, custom: CustomRegistry) -> Self {
        self.custom = custom;
        self
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Runs the profile.
    ///
    /// Setup failures abort the run without a report. `Err` is returned only
    /// when the report itself cannot be written.
    pub fn run(&self) -> Result<RunOutcome> {
        let config = &self.config;
        info!(
            input = %config.csv_file.display(),
            params = %config.param_file.display(),
            "Starting profile"
        );

        let (engine, supplier, source) = match self.prepare() {
            Ok(parts) => parts,
            Err(e) => {
                warn!(error = %e, "Run aborted during setup");
                self.remove_empty_outputs();
                return Ok(RunOutcome::aborted_at_init(&e));
            }
        };

        let mut outcome = engine.run(supplier);
        self.remove_empty_outputs();

        if let Some(report) = outcome.report.take() {
            let report = report
                .with_source(source)
                .with_file("Parameter File", config.param_file.display().to_string())
                .with_file("Input CSV File", config.csv_file.display().to_string())
                .with_file("Report File", config.report_file.display().to_string())
                .with_file("Output CSV File", describe(&config.error_csv_file))
                .with_file("Output Log File", describe(&config.error_log_file));

            let text = report.text().to_string();
            fs::write(&config.report_file, text)
                .map_err(|e| ProfilerError::io(&config.report_file, e))?;
            info!(report = %config.report_file.display(), "Report written");
            outcome.report = Some(report);
        }
        Ok(outcome)
    }

    fn prepare(
        &self,
    ) -> Result<(
        Engine<Vec<Box<dyn ErrorSink>>>,
        CsvRowSupplier<fs::File>,
        crate::input::SourceMetadata,
    )> {
        let config = &self.config;
        let columns = read_param_file(&config.param_file)?;
        let (supplier, source) = CsvRowSupplier::open(&config.csv_file, &config.dialect)?;
        supplier.check_header(&columns.names())?;

        let mut sinks: Vec<Box<dyn ErrorSink>> = Vec::new();
        if let Some(path) = &config.error_csv_file {
            sinks.push(Box::new(CsvErrorSink::create(path)?));
        }
        if let Some(path) = &config.error_log_file {
            sinks.push(Box::new(LogSink::create(path)?));
        }

        let loader = config.resource_loader();
        let engine = Engine::new(
            &columns,
            &loader,
            &self.custom,
            sinks,
            config.engine_options(),
        )?;
        Ok((engine, supplier, source))
    }

    /// Deletes error outputs that received nothing.
    fn remove_empty_outputs(&self) {
        let outputs = [&self.config.error_csv_file, &self.config.error_log_file];
        for path in outputs.into_iter().flatten() {
            let empty = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(false);
            if empty {
                match fs::remove_file(path) {
                    Ok(()) => debug!(path = %path.display(), "Removed empty output"),
                    Err(e) => warn!(path = %path.display(), error = %e, "Could not remove empty output"),
                }
            }
        }
    }
}

fn describe(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{
                "csv_file": "data.csv",
                "param_file": "params.csv",
                "report_file": "/tmp/report.txt",
                "error_csv_file": "out/errors.csv",
                "resources": {"lookup_states": "lists/states.txt"}
            }"#,
        )
        .unwrap();
        let config = ProfilerConfig::load(&path).unwrap();
        assert_eq!(config.csv_file, dir.path().join("data.csv"));
        assert_eq!(config.report_file, PathBuf::from("/tmp/report.txt"));
        assert_eq!(
            config.error_csv_file,
            Some(dir.path().join("out/errors.csv"))
        );
        assert_eq!(config.resources["lookup_states"], dir.path().join("lists/states.txt"));
        assert!(config.dialect.has_header);
        assert_eq!(config.malformed_rows, MalformedRowPolicy::Skip);
    }

    #[test]
    fn test_engine_options_mapping() {
        let mut config = ProfilerConfig::new("a.csv", "p.csv", "r.txt");
        assert_eq!(config.engine_options().key_column, None);
        assert_eq!(config.engine_options().error_row_limit, Limit::Unlimited);

        config.key_column = 2;
        config.error_row_limit = Some(100);
        let options = config.engine_options();
        assert_eq!(options.key_column, Some(1));
        assert_eq!(options.error_row_limit, Limit::Max(100));
    }

    #[test]
    fn test_output_overwriting_input_rejected() {
        let config = ProfilerConfig::new("a.csv", "p.csv", "a.csv");
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_missing_param_file_aborts_without_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "x\n1\n").unwrap();
        let mut config = ProfilerConfig::new("a.csv", "missing.csv", "r.txt");
        config.resolve_paths(dir.path());
        let outcome = Profiler::new(config).run().unwrap();
        assert!(!outcome.status.is_done());
        assert!(outcome.report.is_none());
        assert!(!dir.path().join("r.txt").exists());
    }
}
