//! `validate` command.

use anyhow::Result;
use settings_store::SettingsStore;

use crate::error::CommandError;

pub fn run(store: &mut SettingsStore) -> Result<()> {
    if store.schema().is_none() {
        println!("No schema configured; nothing to validate");
        return Ok(());
    }

    let report = store.validate();
    if report.is_valid() {
        println!("Settings are valid");
        return Ok(());
    }

    for violation in report.violations() {
        println!("{violation}");
    }
    Err(CommandError::Invalid {
        count: report.violations().len(),
    }
    .into())
}
