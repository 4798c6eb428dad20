//! `set` command: merge a value into the document and save it.

use anyhow::{Context, Result};
use settings_store::SettingsStore;

use crate::commands::parse_value;
use crate::error::CommandError;

/// Writes `raw` at `path`, then commits unless the result fails validation.
///
/// With `no_validate` the write skips the schema and is committed as is.
pub fn run(store: &mut SettingsStore, path: &str, raw: &str, no_validate: bool) -> Result<()> {
    let value = parse_value(raw)?;
    store
        .try_set(path, value, no_validate)
        .with_context(|| format!("Rejected write to '{path}'"))?;

    if !no_validate && !store.is_valid() {
        for violation in store.violations() {
            eprintln!("{violation}");
        }
        return Err(CommandError::Invalid {
            count: store.violations().len(),
        }
        .into());
    }

    store.try_commit().context("Failed to save settings")?;
    tracing::debug!(path, "Setting saved");
    Ok(())
}
