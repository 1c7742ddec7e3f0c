mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let context = commands::Context::from_cli(&cli)?;
    match commands::run(&cli.command, &context) {
        Ok(result) => output::render(&result, cli.format, cli.pretty, context.limit()),
        Err(CliError::Data(error)) if cli.format == OutputFormat::Json => {
            output::render_failure(&error, cli.pretty)?;
            Err(CliError::Data(error))
        }
        Err(error) => Err(error),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
