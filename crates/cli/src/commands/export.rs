//! `export` command: write the document to a dated JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use settings_store::{ExportOptions, SettingsStore};

/// Writes the export and prints where it went.
pub fn run(store: &SettingsStore, name: &str, output_file: Option<&Path>) -> Result<()> {
    let export = store.export_file(&ExportOptions::default().with_name(name));
    let target = output_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&export.filename));

    std::fs::write(&target, &export.body)
        .with_context(|| format!("Failed to write export to {}", target.display()))?;
    tracing::debug!(
        path = %target.display(),
        content_type = %export.content_type,
        "Settings exported"
    );

    println!("{}", target.display());
    Ok(())
}
