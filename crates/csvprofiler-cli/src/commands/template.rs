//! Template command - sample a file and write a starter param file.

use std::path::PathBuf;

use colored::Colorize;
use csvprofiler::TemplateGenerator;
use csvprofiler::input::Dialect;
use tracing::debug;

pub fn run(
    file: PathBuf,
    output_dir: Option<PathBuf>,
    sample_rows: usize,
    no_header: bool,
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let output_dir = match output_dir {
        Some(dir) => dir,
        None => file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&output_dir)?;
    debug!(sample_rows, output_dir = %output_dir.display(), "Generating template");

    let mut dialect = Dialect::default();
    dialect.has_header = !no_header;
    let generator = TemplateGenerator::new()
        .with_sample_rows(sample_rows)
        .with_dialect(dialect);

    println!(
        "{} {}",
        "Sampling".cyan().bold(),
        file.display().to_string().white()
    );

    let template = generator.analyze_file(&file)?;
    println!(
        "Sampled {} rows ({} skipped)",
        template.rows_sampled.to_string().white().bold(),
        template.rows_skipped.to_string().yellow()
    );

    if verbose {
        println!();
        println!("{}", "Recommended tests:".yellow().bold());
        for column in &template.columns {
            let length = column
                .length
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:20} {:14} length {:>4}  ({} matches)",
                column.name,
                column.test.to_string(),
                length,
                column.matches
            );
        }
        println!();
    }

    let files = template.write_files(&file, generator.dialect(), &output_dir)?;
    println!(
        "Param file:  {}",
        files.param_file.display().to_string().green()
    );
    println!(
        "Config file: {}",
        files.config_file.display().to_string().green()
    );
    println!();
    println!(
        "Next: review the param file, then {}",
        format!("csvprofiler run {}", files.config_file.display()).cyan()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_param_and_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("orders.csv");
        std::fs::write(&input, "Id,State\n1,NY\n2,PA\n").unwrap();
        let out = dir.path().join("out");

        let code = run(input, Some(out.clone()), 997, false, false).unwrap();
        assert_eq!(code, 0);
        assert!(out.join("orders_csvp.json").exists());
        let params = std::fs::read_dir(&out)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("orders_csvp_params_"))
            .count();
        assert_eq!(params, 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(run(PathBuf::from("/nonexistent/data.csv"), None, 10, false, false).is_err());
    }
}
