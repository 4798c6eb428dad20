//! Error types for the settings store.
//!
//! Responsibilities:
//! - Define one error enum per failure category (paths, values, schema loading,
//!   backend I/O, persistence payloads, configuration), plus `WriteError` for
//!   writes that can fail on either the path or the value.
//!
//! Does NOT handle:
//! - Deciding whether a failure is fatal. The store resolves every one of these
//!   into a flag or status plus a `tracing` diagnostic (see `store.rs`).
//!
//! Invariants:
//! - Every variant carries enough context (path, key, location) to be logged
//!   on its own.

use std::path::PathBuf;
use thiserror::Error;

/// A dot-path that cannot address a document slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
}

/// A JSON value that has no counterpart in the settings value model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("null is not a settings value (at '{path}')")]
    Null { path: String },

    #[error("sequences may only hold scalars (at '{path}')")]
    NestedSequence { path: String },

    #[error("expected a mapping at the document root, found {found}")]
    NotAMapping { found: &'static str },

    #[error("key '{key}' cannot be addressed by a dot-path (under '{parent}')")]
    UnaddressableKey { key: String, parent: String },
}

/// A write rejected before it reached the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Failure to read, parse, or compile a schema description.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema file at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid schema description: {message}")]
    Invalid { message: String },
}

/// Failure reported by a storage backend's read/write primitives.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("backend I/O failed for key '{key}'")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backend rejected write for key '{key}': {message}")]
    Rejected { key: String, message: String },
}

/// Failure while loading or committing a document through a backend.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("stored payload for key '{key}' is not valid JSON")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored payload for key '{key}' is not a settings document")]
    Unrepresentable {
        key: String,
        #[source]
        source: ValueError,
    },

    #[error("failed to serialize document for key '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Invalid store configuration supplied through the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}
