//! In-process backend, shared by clone.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::backend::{Backend, StoredValue};
use crate::error::BackendError;

/// A backend holding values in memory.
///
/// Clones share the same underlying map, so a store built against one clone
/// sees what another clone's store committed.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<BTreeMap<String, StoredValue>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredValue>> {
        // A poisoned map still holds consistent data: every mutation is a
        // single insert.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds a raw text payload, bypassing any store.
    pub fn insert_text(&self, key: impl Into<String>, text: impl Into<String>) {
        self.lock().insert(key.into(), StoredValue::Text(text.into()));
    }

    /// Seeds a structured payload, as legacy storage held documents.
    pub fn insert_native(&self, key: impl Into<String>, value: serde_json::Value) {
        self.lock().insert(key.into(), StoredValue::Native(value));
    }

    /// Returns the text stored under `key`, if it is text.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.lock().get(key) {
            Some(StoredValue::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<StoredValue>, BackendError> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.insert_text(key, value);
        Ok(())
    }
}
