//! Command dispatch logic.
//!
//! Responsibilities:
//! - Open the file-backed settings store described by the global options.
//! - Route parsed CLI arguments to the matching command handler.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Exit code selection (see `error` module).

use anyhow::{Context, Result};
use settings_store::{BackendRegistry, FileBackend, Schema, SettingsStore, StoreConfig};

use crate::args::{Cli, Commands};
use crate::commands;

/// Registry name of the file backend the CLI binds.
const FILE_BACKEND: &str = "file";

/// Opens the store for `cli`, loading the persisted document and schema.
///
/// Auto-commit stays off; commands that write commit explicitly so a
/// failed write can be reported.
pub(crate) fn open_store(cli: &Cli) -> Result<SettingsStore> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => FileBackend::default_dir().context("Failed to resolve settings directory")?,
    };
    tracing::debug!(dir = %dir.display(), key = %cli.key, "Opening settings store");

    let registry = BackendRegistry::new().with(FILE_BACKEND, FileBackend::new(dir));
    let mut config = StoreConfig::new()
        .with_store(FILE_BACKEND)
        .with_key(cli.key.clone())
        .with_debug(cli.debug);
    if let Some(namespace) = &cli.namespace {
        config = config.with_namespace(namespace.clone());
    }

    let mut store = SettingsStore::new(config, &registry);
    if let Some(path) = &cli.schema {
        let schema = Schema::from_path(path)
            .with_context(|| format!("Failed to load schema from {}", path.display()))?;
        store.set_schema(Some(schema));
    }
    Ok(store)
}

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    let mut store = open_store(&cli)?;
    let output = cli.output;

    match cli.command {
        Commands::Get { path, default } => {
            commands::get::run(&store, path.as_deref(), default.as_deref(), output)
        }
        Commands::Set {
            path,
            value,
            no_validate,
        } => commands::set::run(&mut store, &path, &value, no_validate),
        Commands::Validate => commands::validate::run(&mut store),
        Commands::Export { name, output_file } => {
            commands::export::run(&store, &name, output_file.as_deref())
        }
        Commands::List => commands::list::run(&store),
    }
}
