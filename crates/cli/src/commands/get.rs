//! `get` command: print one value or the whole document.

use anyhow::Result;
use settings_store::{OutputFormat, SettingsStore};

use crate::args::OutputKind;
use crate::commands::parse_value;
use crate::error::CommandError;
use crate::formatters::format_value;

pub fn run(
    store: &SettingsStore,
    path: Option<&str>,
    default: Option<&str>,
    output: OutputKind,
) -> Result<()> {
    let json = match path {
        None => store
            .export(OutputFormat::Object)
            .into_object()
            .unwrap_or_default(),
        Some(path) => resolve(store, path, default)?,
    };

    println!("{}", format_value(&json, output)?);
    Ok(())
}

/// Looks up `path`, falling back to the parsed `default` only when the path
/// holds no value at all.
fn resolve(
    store: &SettingsStore,
    path: &str,
    default: Option<&str>,
) -> Result<serde_json::Value> {
    match (store.get(path), default) {
        (Some(value), _) => Ok(value.clone().into()),
        (None, Some(default)) => Ok(parse_value(default)?.into()),
        (None, None) => Err(CommandError::NotFound {
            path: path.to_string(),
        }
        .into()),
    }
}
