//! Run command - validate and profile a file from a run configuration.

use std::path::PathBuf;

use colored::Colorize;
use csvprofiler::report::grouped;
use csvprofiler::{ErrorCategory, Profiler, RunStatus};
use tracing::debug;

/// Exit code for a run that aborted.
pub const EXIT_ABORTED: i32 = 2;

pub fn run(
    config: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    if !config.exists() {
        return Err(format!("Config file not found: {}", config.display()).into());
    }

    let profiler = Profiler::from_config_file(&config)?;
    let settings = profiler.config();

    if !json_output {
        println!(
            "{} {}",
            "Profiling".cyan().bold(),
            settings.csv_file.display().to_string().white()
        );
        if verbose {
            println!("  Params: {}", settings.param_file.display());
            println!("  Report: {}", settings.report_file.display());
        }
    }

    let outcome = profiler.run()?;
    debug!(status = ?outcome.status, "Profile complete");

    if json_output {
        match &outcome.report {
            Some(report) => println!("{}", report.to_json()?),
            None => println!("{}", serde_json::to_string_pretty(&outcome.status)?),
        }
    } else if let Some(report) = &outcome.report {
        let totals = &report.totals;
        println!();
        println!(
            "Processed {} rows ({} malformed)",
            grouped(totals.rows_processed).white().bold(),
            grouped(totals.malformed_rows).yellow()
        );
        println!(
            "Found {} failures in {} rows, {} written",
            grouped(totals.total_failures()).red().bold(),
            grouped(totals.rows_with_failures),
            grouped(totals.failures_emitted)
        );

        if verbose {
            println!();
            println!("{}", "Failures by category:".yellow().bold());
            for category in ErrorCategory::ALL {
                let count = totals.failures.get(&category).copied().unwrap_or(0);
                println!("  {:<8} {}", category.label(), grouped(count));
            }
            println!();
            println!("{}", "Columns:".yellow().bold());
            for column in &report.columns {
                let failures = column.total_failures();
                let count = if failures > 0 {
                    grouped(failures).red()
                } else {
                    grouped(failures).green()
                };
                println!("  {:20} {:16} {}", column.name, column.test, count);
            }
        }

        println!();
        println!(
            "Report written to {}",
            settings.report_file.display().to_string().green()
        );
    }

    match outcome.status {
        RunStatus::Done => Ok(0),
        RunStatus::Aborted { reason } => {
            eprintln!("{} {}", "Run aborted:".red().bold(), reason);
            Ok(EXIT_ABORTED)
        }
    }
}
