//! Example: Profile a CSV file from a run configuration.
//!
//! Usage:
//!   cargo run --example profile -- <config.json>
//!
//! Without a config, a template is generated next to the input first:
//!   cargo run --example profile -- --template <file.csv>

use std::env;
use std::path::Path;

use csvprofiler::{Profiler, RunStatus, TemplateGenerator};

fn main() -> csvprofiler::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csvprofiler=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1).map(String::as_str) {
        Some("--template") => {
            let Some(file) = args.get(2) else {
                eprintln!("Usage: cargo run --example profile -- --template <file.csv>");
                std::process::exit(1);
            };
            let path = Path::new(file);
            let generator = TemplateGenerator::new();
            let template = generator.analyze_file(path)?;
            for column in &template.columns {
                println!("{:20} {} ({} matches)", column.name, column.test, column.matches);
            }
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            template.write_files(path, generator.dialect(), dir)?.config_file
        }
        Some(config) => config.into(),
        None => {
            eprintln!("Usage: cargo run --example profile -- <config.json>");
            std::process::exit(1);
        }
    };

    let separator = "=".repeat(80);
    println!("{separator}");
    println!("csvprofiler: {}", config.display());
    println!("{separator}");

    let outcome = Profiler::from_config_file(&config)?.run()?;
    if let RunStatus::Aborted { reason } = &outcome.status {
        println!("Run aborted: {reason}");
    }
    if let Some(report) = &outcome.report {
        println!("{}", report.text());
    }
    Ok(())
}
