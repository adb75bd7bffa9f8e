//! csvprofiler CLI: validate and profile delimited files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let default = if verbose { "csvprofiler=debug" } else { "csvprofiler=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json } => commands::run::run(config, json, cli.verbose),

        Commands::Template {
            file,
            output_dir,
            sample_rows,
            no_header,
        } => commands::template::run(file, output_dir, sample_rows, no_header, cli.verbose),

        Commands::Tests => commands::tests::run(cli.verbose),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
