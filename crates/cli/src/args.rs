//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Read store location overrides from environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not open the store (see `dispatch::open_store`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(about = "Read, write, validate, and export path-addressed settings", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  settings-cli set server.host localhost\n  settings-cli set server.port 8080\n  settings-cli set tags '[\"a\",\"b\"]'\n  settings-cli get server --output pretty\n  settings-cli --schema schema.json validate\n  settings-cli export --name site\n"
)]
pub struct Cli {
    /// Directory holding settings files (defaults to the platform config dir)
    #[arg(long, global = true, env = "SETTINGS_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Storage key of the settings document
    #[arg(short, long, global = true, env = "SETTINGS_KEY", default_value = "settings")]
    pub key: String,

    /// Namespace prefixed to the storage key
    #[arg(short, long, global = true, env = "SETTINGS_NAMESPACE")]
    pub namespace: Option<String>,

    /// JSON schema file used for validation
    #[arg(long, global = true, env = "SETTINGS_SCHEMA", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputKind::Json)]
    pub output: OutputKind,

    /// Raise store lifecycle logging from debug to info
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value at a path, or the whole document
    Get {
        /// Dot-separated path (e.g. server.port)
        path: Option<String>,

        /// Value printed when the path is missing (parsed as JSON, else a string)
        #[arg(short, long, value_name = "VALUE")]
        default: Option<String>,
    },

    /// Merge a value into the document at a path and save it
    Set {
        /// Dot-separated path (e.g. server.port)
        path: String,

        /// Value to write (parsed as JSON, else stored as a string)
        value: String,

        /// Skip schema validation for this write
        #[arg(long)]
        no_validate: bool,
    },

    /// Validate the document against the configured schema
    Validate,

    /// Write the document as a dated JSON export file
    Export {
        /// Base of the export filename
        #[arg(long, default_value = "settings")]
        name: String,

        /// Write to this file instead of the suggested filename
        #[arg(long, value_name = "FILE")]
        output_file: Option<PathBuf>,
    },

    /// Print every leaf as `path = value`
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_with_global_options() {
        let cli = Cli::try_parse_from([
            "settings-cli",
            "set",
            "server.port",
            "8080",
            "--key",
            "site",
            "--no-validate",
        ])
        .unwrap();

        assert_eq!(cli.key, "site");
        match cli.command {
            Commands::Set {
                path,
                value,
                no_validate,
            } => {
                assert_eq!(path, "server.port");
                assert_eq!(value, "8080");
                assert!(no_validate);
            }
            _ => panic!("expected set command"),
        }
    }

    #[test]
    fn test_output_kind_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["settings-cli", "--output", "xml", "list"]).is_err());
    }
}
