//! File-backed backend: one JSON file per storage key.
//!
//! Responsibilities:
//! - Map storage keys to `<root>/<key>.json`.
//! - Write atomically through a temporary file and rename.
//! - Resolve a platform-standard default directory.
//!
//! Does NOT handle:
//! - Parsing payloads (see `adapter.rs`); files are returned as raw text.
//!
//! Invariants:
//! - Keys are restricted to `[A-Za-z0-9_.-]` and may not start with `.`, so a
//!   key can never escape the root directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::backend::{Backend, StoredValue};
use crate::error::BackendError;

/// A backend that stores each key in its own file under a root directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the default storage directory:
    /// - Linux/macOS: `~/.config/settings-store/`
    /// - Windows: `%AppData%\settings-store\`
    pub fn default_dir() -> Result<PathBuf, anyhow::Error> {
        let proj_dirs = directories::ProjectDirs::from("", "", "settings-store")
            .context("Failed to determine project directories")?;

        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Creates a backend rooted at [`default_dir`](Self::default_dir).
    pub fn with_default_dir() -> Result<Self, anyhow::Error> {
        Ok(Self::new(Self::default_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file that holds `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, BackendError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<(), BackendError> {
    let invalid = |reason| BackendError::InvalidKey {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.starts_with('.') {
        return Err(invalid("key may not start with '.'"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(invalid("key may only contain ASCII letters, digits, '_', '-', '.'"));
    }
    Ok(())
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<StoredValue>, BackendError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(StoredValue::Text(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let path = self.path_for(key)?;
        let io_err = |source| BackendError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.root).map_err(io_err)?;

        // Write to a temporary file first
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value).map_err(io_err)?;

        // Atomically rename the temporary file to the target path
        std::fs::rename(&temp_path, &path).map_err(io_err)?;

        tracing::debug!(path = %path.display(), "Settings file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_dir_matches_expected_project_dirs() {
        let expected = directories::ProjectDirs::from("", "", "settings-store")
            .unwrap()
            .config_dir()
            .to_path_buf();
        assert_eq!(FileBackend::default_dir().unwrap(), expected);
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        assert_eq!(backend.read("site").unwrap(), None);
    }

    #[test]
    fn test_write_creates_root_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("store");
        let backend = FileBackend::new(&root);

        backend.write("app.site", r#"{"a":1}"#).unwrap();

        let file = root.join("app.site.json");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"a":1}"#);
        assert!(!root.join("app.site.json.tmp").exists());
        assert_eq!(
            backend.read("app.site").unwrap(),
            Some(StoredValue::Text(r#"{"a":1}"#.to_string()))
        );
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        for bad in ["", "../etc", "a/b", ".hidden", "a\\b"] {
            assert!(
                matches!(backend.write(bad, "{}"), Err(BackendError::InvalidKey { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
