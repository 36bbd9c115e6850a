//! sandcalc - sand prediction client
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use sandcalc::cli::{Cli, Commands, OutputFormat};
use sandcalc::core::logging;
use sandcalc::error::SandcalcError;
use sandcalc::storage::ResolvedConfig;
use sandcalc::util::env::{Stream, should_use_color};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let log = logging::LogSettings::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
        |key| std::env::var(key).ok(),
    );
    logging::init(&log);

    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let mut config = match ResolvedConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            // Config could not be resolved; fall back to the raw flags.
            let format = cli.requested_format().unwrap_or_default();
            return fail(&e, format, cli.no_color, cli.pretty);
        }
    };
    config.no_color = !should_use_color(config.no_color, Stream::Stdout);

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e, config.format, config.no_color, config.pretty),
    }
}

fn fail(e: &SandcalcError, format: OutputFormat, no_color: bool, pretty: bool) -> ExitCode {
    tracing::error!(code = e.error_code(), "{}", e);
    let rendered = sandcalc::render::error::render_error(e, format, no_color, pretty);
    eprintln!("{rendered}");
    ExitCode::from(e.exit_code() as u8)
}

async fn run(cli: &Cli, config: &ResolvedConfig) -> sandcalc::Result<()> {
    match &cli.command {
        Commands::Predict(args) => sandcalc::cli::predict::execute(args, config).await,
        Commands::Interface(args) => sandcalc::cli::interface::execute(args, config).await,
        Commands::Run(args) => sandcalc::cli::run::execute(args, config).await,
        Commands::Config => sandcalc::cli::config::execute(config),
    }
}
