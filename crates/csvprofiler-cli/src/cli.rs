//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// csvprofiler: column validation and profiling for delimited files
#[derive(Parser)]
#[command(name = "csvprofiler")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and profile a file as described by a run configuration
    Run {
        /// Path to the JSON run configuration
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Sample a data file and write a starter param file and configuration
    Template {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory for the generated files (default: next to FILE)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Number of rows to sample
        #[arg(long, default_value = "997")]
        sample_rows: usize,

        /// Treat the first row as data
        #[arg(long)]
        no_header: bool,
    },

    /// List the built-in column tests
    Tests,
}
