//! Path-addressed settings store.
//!
//! A `SettingsStore` holds one settings document that is read and written
//! through dot-separated paths (`"server.port"`), merged by value type,
//! optionally validated against a JSON schema, and persisted through a
//! pluggable backend.
//!
//! ```
//! use settings_store::{BackendRegistry, MemoryBackend, SettingsStore, StoreConfig, Value};
//!
//! let registry = BackendRegistry::new().with("memory", MemoryBackend::new());
//! let config = StoreConfig::new().with_store("memory").with_key("app");
//!
//! let mut store = SettingsStore::new(config, &registry);
//! store.set("server.host", "localhost").set("server.port", 8080).commit();
//!
//! assert_eq!(store.get("server.port"), Some(&Value::from(8080)));
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod output;
pub mod path;
pub mod persistence;
pub mod schema;
mod store;
pub mod value;

pub use config::{StoreConfig, env_var_or_none};
pub use error::{
    BackendError, ConfigError, PathError, PersistenceError, SchemaError, ValueError, WriteError,
};
pub use output::{Export, ExportOptions, Output, OutputFormat};
pub use path::PathExpression;
pub use persistence::{
    Backend, BackendRegistry, CommitOutcome, FileBackend, LoadOutcome, MemoryBackend,
    PersistenceAdapter, StoredValue,
};
pub use schema::{
    JsonSchemaValidator, Schema, SchemaSource, SchemaValidator, ValidationReport, Violation,
};
pub use store::{CommitStatus, SettingsStore};
pub use value::{Document, Scalar, Value};
