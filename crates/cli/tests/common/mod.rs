//! Shared test utilities for settings-cli integration tests.
//!
//! Invariants / Assumptions:
//! - Every command is hermetic: no `.env` loading, no `SETTINGS_*` from the host.
//! - Each test owns its settings directory through a `TempDir`.

use assert_cmd::Command;
use std::path::Path;

/// Returns a hermetic `settings-cli` command storing its files in `dir`.
pub fn settings_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("settings-cli");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    // Clear potential host leakage
    cmd.env_remove("SETTINGS_KEY")
        .env_remove("SETTINGS_NAMESPACE")
        .env_remove("SETTINGS_SCHEMA")
        .env_remove("RUST_LOG");

    cmd.env("SETTINGS_DIR", dir);
    cmd
}

/// Writes a schema requiring an integer `port` of at least 1 and returns its path.
#[allow(dead_code)]
pub fn write_port_schema(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("schema.json");
    std::fs::write(
        &path,
        r#"{"type":"object","properties":{"port":{"type":"integer","minimum":1}}}"#,
    )
    .unwrap();
    path
}
