//! Load/commit lifecycle over a named backend.

use std::fmt;
use std::sync::Arc;

use super::backend::{Backend, BackendRegistry, StoredValue};
use crate::error::PersistenceError;
use crate::value::Document;

/// Result of a successful load attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A stored document was found and decoded.
    Loaded(Document),
    /// The backend holds nothing for the key.
    Missing,
    /// No backend is bound; the store is in-memory only.
    Detached,
}

/// Result of a successful commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Written,
    /// No backend is bound; nothing was persisted.
    Skipped,
}

/// Binds a storage key to a backend resolved by name.
#[derive(Clone)]
pub struct PersistenceAdapter {
    backend_name: Option<String>,
    key: String,
    backend: Option<Arc<dyn Backend>>,
}

impl fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("backend_name", &self.backend_name)
            .field("key", &self.key)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl PersistenceAdapter {
    /// Resolves `backend_name` in `registry`.
    ///
    /// An unknown name or an empty key leaves the adapter detached.
    pub fn new(backend_name: Option<&str>, key: impl Into<String>, registry: &BackendRegistry) -> Self {
        let key = key.into();
        let backend = match backend_name {
            Some(name) => {
                let found = registry.get(name);
                if found.is_none() {
                    tracing::warn!(
                        backend = name,
                        "Unknown settings backend, store will be in-memory only"
                    );
                }
                found
            }
            None => None,
        };

        let backend = if key.is_empty() && backend.is_some() {
            tracing::warn!(
                backend = backend_name.unwrap_or_default(),
                "Empty storage key, store will be in-memory only"
            );
            None
        } else {
            backend
        };

        Self {
            backend_name: backend_name.map(str::to_string),
            key,
            backend,
        }
    }

    /// An adapter that never touches storage.
    pub fn detached() -> Self {
        Self {
            backend_name: None,
            key: String::new(),
            backend: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend_name.as_deref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and decodes the stored document.
    ///
    /// # Errors
    /// Returns `PersistenceError` when the backend read fails or the payload
    /// is not a settings document.
    pub fn load(&self) -> Result<LoadOutcome, PersistenceError> {
        let Some(backend) = &self.backend else {
            return Ok(LoadOutcome::Detached);
        };

        match backend.read(&self.key)? {
            None => Ok(LoadOutcome::Missing),
            Some(StoredValue::Native(value)) => self.decode(value),
            Some(StoredValue::Text(text)) => {
                if text.trim().is_empty() {
                    return Ok(LoadOutcome::Missing);
                }
                let value: serde_json::Value =
                    serde_json::from_str(&text).map_err(|e| PersistenceError::Malformed {
                        key: self.key.clone(),
                        source: e,
                    })?;
                self.decode(value)
            }
        }
    }

    fn decode(&self, value: serde_json::Value) -> Result<LoadOutcome, PersistenceError> {
        match value {
            serde_json::Value::Null => Ok(LoadOutcome::Missing),
            // legacy writers encoded an empty mapping as a list
            serde_json::Value::Array(items) if items.is_empty() => {
                Ok(LoadOutcome::Loaded(Document::new()))
            }
            other => Document::try_from(other)
                .map(LoadOutcome::Loaded)
                .map_err(|e| PersistenceError::Unrepresentable {
                    key: self.key.clone(),
                    source: e,
                }),
        }
    }

    /// Serializes `document` as a JSON object and writes it.
    ///
    /// # Errors
    /// Returns `PersistenceError` when serialization or the backend write fails.
    pub fn commit(&self, document: &Document) -> Result<CommitOutcome, PersistenceError> {
        let Some(backend) = &self.backend else {
            return Ok(CommitOutcome::Skipped);
        };

        let payload = serde_json::to_string(document).map_err(|e| PersistenceError::Serialize {
            key: self.key.clone(),
            source: e,
        })?;
        backend.write(&self.key, &payload)?;
        Ok(CommitOutcome::Written)
    }
}
