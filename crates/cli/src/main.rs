//! settings-cli - Command-line access to a file-backed settings store.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Open the settings store and run one command against it.
//! - Map failures to structured exit codes.
//!
//! Does NOT handle:
//! - Path addressing, merging, or validation rules (see `crates/store`).
//!
//! Invariants:
//! - `load_dotenv()` runs BEFORE CLI parsing so `.env` can provide clap defaults.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use settings_store::env_var_or_none;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    if let Err(e) = load_dotenv() {
        eprintln!("Failed to load environment: {:#}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Loads `.env` from the working directory unless `DOTENV_DISABLED` is set.
/// A missing file is not an error.
fn load_dotenv() -> anyhow::Result<()> {
    if dotenv_disabled() {
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(dotenvy::Error::LineParse(_, index)) => {
            anyhow::bail!("Invalid .env syntax at position {index}")
        }
        Err(e) => Err(e.into()),
    }
}

fn dotenv_disabled() -> bool {
    env_var_or_none("DOTENV_DISABLED")
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}
