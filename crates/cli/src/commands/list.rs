//! `list` command: one line per leaf.

use anyhow::Result;
use settings_store::SettingsStore;
use settings_store::path::flatten;

use crate::args::OutputKind;
use crate::formatters::format_value;

pub fn run(store: &SettingsStore) -> Result<()> {
    for line in lines(store)? {
        println!("{line}");
    }
    Ok(())
}

/// Leaf values are always compact JSON so each fits on one line.
fn lines(store: &SettingsStore) -> Result<Vec<String>> {
    flatten(store.document())
        .into_iter()
        .map(|(path, value)| {
            let rendered = format_value(&serde_json::Value::from(value), OutputKind::Json)?;
            Ok(format!("{path} = {rendered}"))
        })
        .collect()
}
