//! Store construction options.
//!
//! Responsibilities:
//! - Hold every recognized construction option with its default.
//! - Deserialize options from JSON (camelCase and snake_case spellings).
//! - Read options from `SETTINGS_*` environment variables.
//!
//! Does NOT handle:
//! - Resolving backends or loading schemas (see `store.rs`).
//!
//! Invariants:
//! - Defaults: empty namespace and key, no backend, no schema, raw output,
//!   auto-commit and debug off, validation on write enabled.
//! - Empty or whitespace-only environment variables are treated as unset.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::schema::SchemaSource;

/// Construction options for a `SettingsStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix scoping the storage key when stores share a backend.
    pub namespace: String,
    /// Persistence identifier within the backend.
    pub key: String,
    /// Persist after every valid write.
    #[serde(alias = "autoCommit")]
    pub auto_commit: bool,
    /// Raise lifecycle diagnostics from `debug` to `info`.
    pub debug: bool,
    /// Name of the backend in the registry.
    pub store: Option<String>,
    pub schema: Option<SchemaSource>,
    /// Representation returned by `get_all`.
    pub format: OutputFormat,
    /// Re-run schema validation after each write.
    #[serde(alias = "validateOnWrite")]
    pub validate_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            key: String::new(),
            auto_commit: false,
            debug: false,
            store: None,
            schema: None,
            format: OutputFormat::Raw,
            validate_on_write: true,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<SchemaSource>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_validate_on_write(mut self, validate: bool) -> Self {
        self.validate_on_write = validate;
        self
    }

    /// Key handed to the backend: `namespace.key`, or `key` alone when no
    /// namespace is set.
    pub fn storage_key(&self) -> String {
        match (self.namespace.is_empty(), self.key.is_empty()) {
            (true, _) => self.key.clone(),
            (false, true) => String::new(),
            (false, false) => format!("{}.{}", self.namespace, self.key),
        }
    }

    /// Overlays values from `SETTINGS_*` environment variables.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for unparsable booleans or formats.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if let Some(namespace) = env_var_or_none("SETTINGS_NAMESPACE") {
            self.namespace = namespace;
        }
        if let Some(key) = env_var_or_none("SETTINGS_KEY") {
            self.key = key;
        }
        if let Some(store) = env_var_or_none("SETTINGS_STORE") {
            self.store = Some(store);
        }
        if let Some(schema) = env_var_or_none("SETTINGS_SCHEMA") {
            self.schema = Some(SchemaSource::Path(schema.into()));
        }
        if let Some(format) = env_var_or_none("SETTINGS_FORMAT") {
            self.format = format.parse().map_err(|_| ConfigError::InvalidValue {
                var: "SETTINGS_FORMAT".to_string(),
                message: "must be one of raw, array, hash-map, json, object".to_string(),
            })?;
        }
        if let Some(flag) = env_var_or_none("SETTINGS_AUTO_COMMIT") {
            self.auto_commit = parse_bool("SETTINGS_AUTO_COMMIT", &flag)?;
        }
        if let Some(flag) = env_var_or_none("SETTINGS_DEBUG") {
            self.debug = parse_bool("SETTINGS_DEBUG", &flag)?;
        }
        Ok(self)
    }
}

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "must be true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::path::PathBuf;

    const VARS: [&str; 7] = [
        "SETTINGS_NAMESPACE",
        "SETTINGS_KEY",
        "SETTINGS_STORE",
        "SETTINGS_SCHEMA",
        "SETTINGS_FORMAT",
        "SETTINGS_AUTO_COMMIT",
        "SETTINGS_DEBUG",
    ];

    /// Every recognized variable, unset unless overridden.
    fn env_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter()
            .map(|var| {
                let value = overrides.iter().find(|(k, _)| k == var).map(|(_, v)| *v);
                (*var, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.namespace, "");
        assert_eq!(config.key, "");
        assert!(!config.auto_commit);
        assert!(!config.debug);
        assert!(config.store.is_none());
        assert!(config.schema.is_none());
        assert_eq!(config.format, OutputFormat::Raw);
        assert!(config.validate_on_write);
    }

    #[test]
    fn test_deserialize_partial_json_with_camel_case() {
        let config: StoreConfig = serde_json::from_value(json!({
            "key": "site",
            "store": "options",
            "autoCommit": true,
            "format": "json",
            "schema": "schema.json"
        }))
        .unwrap();
        assert_eq!(config.key, "site");
        assert_eq!(config.store.as_deref(), Some("options"));
        assert!(config.auto_commit);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(
            config.schema,
            Some(SchemaSource::Path(PathBuf::from("schema.json")))
        );
        assert!(config.validate_on_write);
    }

    #[test]
    fn test_storage_key_applies_namespace() {
        let config = StoreConfig::new().with_key("site");
        assert_eq!(config.storage_key(), "site");
        assert_eq!(config.with_namespace("app").storage_key(), "app.site");
        assert_eq!(StoreConfig::new().with_namespace("app").storage_key(), "");
    }

    #[test]
    #[serial]
    fn test_from_env_overlays_values() {
        let vars = env_with(&[
            ("SETTINGS_KEY", "site"),
            ("SETTINGS_STORE", " options "),
            ("SETTINGS_AUTO_COMMIT", "yes"),
            ("SETTINGS_FORMAT", "object"),
        ]);
        temp_env::with_vars(vars, || {
            let config = StoreConfig::new().from_env().unwrap();
            assert_eq!(config.key, "site");
            assert_eq!(config.store.as_deref(), Some("options"));
            assert!(config.auto_commit);
            assert_eq!(config.format, OutputFormat::Object);
        });
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_blank_values() {
        let vars = env_with(&[("SETTINGS_KEY", "   ")]);
        temp_env::with_vars(vars, || {
            let config = StoreConfig::new().with_key("kept").from_env().unwrap();
            assert_eq!(config.key, "kept");
        });
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_boolean() {
        let vars = env_with(&[("SETTINGS_DEBUG", "maybe")]);
        temp_env::with_vars(vars, || {
            let err = StoreConfig::new().from_env().unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    var: "SETTINGS_DEBUG".to_string(),
                    message: "must be true or false".to_string(),
                }
            );
        });
    }
}
