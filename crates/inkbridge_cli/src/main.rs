//! Import runner CLI.
//!
//! # Responsibility
//! - Wire configuration, logging and the vault session into one import
//!   run.
//! - Map fatal failures (config, session, template, scan) to a non-zero
//!   exit code; per-file failures only show up in the report counts.

use clap::Parser;
use inkbridge_core::{
    default_log_level, init_logging, load_config, ExportScanner, ImportService, StdioVaultSession,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "inkbridge",
    version,
    about = "Imports handwriting exports into daily notes"
)]
struct Cli {
    /// Path to the JSON run configuration.
    #[arg(long)]
    config: PathBuf,

    /// Absolute directory for rolling log files; file logging is skipped
    /// when absent.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("inkbridge: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, &log_dir.display().to_string())?;
    }

    let config = load_config(&cli.config)?;
    let scanner = ExportScanner::from_config(&config);
    let session =
        StdioVaultSession::connect(&config.vault_server.command, &config.vault_server.args)?;

    let mut service = ImportService::new(session, config);
    service.load_template()?;
    let report = service.run(&scanner)?;

    println!("processed={} failed={}", report.processed, report.failed);
    Ok(())
}
