//! Output formatters for CLI commands.
//!
//! Every command prints through `format_value`, so `--output` applies
//! uniformly to single values and whole documents.

use anyhow::{Context, Result};

use crate::args::OutputKind;

/// Render `value` in the requested format, without a trailing newline.
pub fn format_value(value: &serde_json::Value, kind: OutputKind) -> Result<String> {
    let rendered = match kind {
        OutputKind::Json => serde_json::to_string(value).context("Failed to serialize JSON")?,
        OutputKind::Pretty => {
            serde_json::to_string_pretty(value).context("Failed to serialize JSON")?
        }
        OutputKind::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML")?,
    };
    Ok(rendered.trim_end().to_string())
}
