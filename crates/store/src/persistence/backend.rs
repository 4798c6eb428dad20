//! Backend contract and name registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BackendError;

/// A raw value as held by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// JSON-encoded document text, the format every commit produces.
    Text(String),
    /// A structured value the backend already decoded. Legacy stores kept
    /// documents this way instead of as JSON text.
    Native(serde_json::Value),
}

/// Read/write primitives of a key-value storage mechanism.
///
/// Implementations synchronize internally; several stores may share one
/// backend through a [`BackendRegistry`].
pub trait Backend: Send + Sync {
    /// Returns the stored value for `key`, or `None` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<StoredValue>, BackendError>;

    /// Replaces the value stored for `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

/// Named backends available to stores at construction time.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn Backend>>,
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("names", &self.backends.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `backend` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, backend: impl Backend + 'static) {
        self.backends.insert(name.into(), Arc::new(backend));
    }

    /// Chainable form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, backend: impl Backend + 'static) -> Self {
        self.register(name, backend);
        self
    }

    /// Registers an already shared backend.
    pub fn register_shared(&mut self, name: impl Into<String>, backend: Arc<dyn Backend>) {
        self.backends.insert(name.into(), backend);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.backends.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }
}
