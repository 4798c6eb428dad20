//! Schema loading and document validation.
//!
//! Responsibilities:
//! - Accept a schema inline or from a file and compile it once.
//! - Validate whole documents and report violations as `{property, message}`.
//! - Provide the `SchemaValidator` seam so another validation engine can be
//!   injected in place of the default `jsonschema` one.
//!
//! Does NOT handle:
//! - Deciding when validation runs or what a failure blocks (see `store.rs`).
//! - Implementing a schema language; structural checks are delegated.
//!
//! Invariants:
//! - A `Schema` value is always usable: loading either yields a compiled
//!   schema or an error, never a half-initialized one.
//! - A report with no violations is valid.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::Document;

/// Where a schema description comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    /// A readable file holding a JSON schema (`file://` prefix accepted).
    Path(PathBuf),
    /// The schema description itself.
    Inline(serde_json::Value),
}

impl From<serde_json::Value> for SchemaSource {
    fn from(value: serde_json::Value) -> Self {
        SchemaSource::Inline(value)
    }
}

impl From<PathBuf> for SchemaSource {
    fn from(path: PathBuf) -> Self {
        SchemaSource::Path(path)
    }
}

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending location (`""` for the document root).
    pub property: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.property, self.message)
    }
}

/// Outcome of the most recent validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// External structural validation capability.
pub trait SchemaValidator: Send + Sync {
    /// Checks `instance` and returns every violation found.
    fn check(&self, instance: &serde_json::Value) -> Vec<Violation>;
}

/// Default validator backed by the `jsonschema` crate.
pub struct JsonSchemaValidator {
    inner: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compiles `schema`.
    ///
    /// # Errors
    /// Returns `SchemaError::Invalid` when the description is not a valid schema.
    pub fn compile(schema: &serde_json::Value) -> Result<Self, SchemaError> {
        let inner = jsonschema::validator_for(schema).map_err(|e| SchemaError::Invalid {
            message: e.to_string(),
        })?;
        Ok(Self { inner })
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn check(&self, instance: &serde_json::Value) -> Vec<Violation> {
        self.inner
            .iter_errors(instance)
            .map(|error| Violation {
                property: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect()
    }
}

/// A loaded schema paired with the validator that enforces it.
#[derive(Clone)]
pub struct Schema {
    raw: serde_json::Value,
    validator: Arc<dyn SchemaValidator>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("raw", &self.raw).finish_non_exhaustive()
    }
}

impl Schema {
    /// Loads a schema from any supported source and compiles it with
    /// [`JsonSchemaValidator`].
    ///
    /// # Errors
    /// Returns a `SchemaError` when the file cannot be read or parsed, or the
    /// description does not compile.
    pub fn load(source: &SchemaSource) -> Result<Self, SchemaError> {
        match source {
            SchemaSource::Inline(raw) => Self::from_value(raw.clone()),
            SchemaSource::Path(path) => Self::from_path(path),
        }
    }

    /// Compiles an inline description.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, SchemaError> {
        let validator = JsonSchemaValidator::compile(&raw)?;
        Ok(Self::with_validator(raw, validator))
    }

    /// Reads, parses, and compiles a schema file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let path = strip_file_scheme(path);
        let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::Read {
            path: path.clone(),
            source: e,
        })?;
        let raw: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| SchemaError::Parse {
                path: path.clone(),
                source: e,
            })?;
        Self::from_value(raw)
    }

    /// Pairs a description with an externally supplied validator.
    pub fn with_validator(raw: serde_json::Value, validator: impl SchemaValidator + 'static) -> Self {
        Self {
            raw,
            validator: Arc::new(validator),
        }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Validates the whole document.
    pub fn validate(&self, document: &Document) -> ValidationReport {
        let instance = serde_json::Value::from(document.clone());
        ValidationReport::from_violations(self.validator.check(&instance))
    }
}

fn strip_file_scheme(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix("file://")) {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}
