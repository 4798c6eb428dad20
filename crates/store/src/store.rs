//! The settings store orchestrator.
//!
//! Responsibilities:
//! - Own the document and run the load → write → validate → commit lifecycle.
//! - Route path writes through the merge rules.
//! - Split dotted keys of incoming documents before they are merged.
//! - Resolve every failure into a flag, a status, or a `tracing` diagnostic.
//!
//! Does NOT handle:
//! - Storage I/O details (see `persistence/`).
//! - Structural schema checks (see `schema.rs`).
//!
//! Invariants:
//! - The document is loaded exactly once, at construction.
//! - A rejected write leaves the document untouched.
//! - Auto-commit only fires when the latest validation run passed.
//! - Without a schema the store is always valid.

use crate::config::StoreConfig;
use crate::error::{PersistenceError, WriteError};
use crate::merge;
use crate::output::{Export, ExportOptions, Output, OutputFormat};
use crate::path::{self, PathExpression};
use crate::persistence::{BackendRegistry, CommitOutcome, LoadOutcome, PersistenceAdapter};
use crate::schema::{Schema, ValidationReport, Violation};
use crate::value::{Document, Value};

/// What the most recent `commit` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Written,
    /// No backend is bound.
    Skipped,
    /// The backend or serializer failed; the error was logged.
    Failed,
}

/// A path-addressed settings document bound to an optional schema and backend.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    document: Document,
    schema: Option<Schema>,
    namespace: String,
    key: String,
    persistence: PersistenceAdapter,
    auto_commit: bool,
    debug: bool,
    validate_on_write: bool,
    format: OutputFormat,
    report: ValidationReport,
    last_commit: Option<CommitStatus>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SettingsStore {
    /// Builds a store from `config`, resolving its backend in `registry`.
    ///
    /// Never fails: an unreadable schema leaves the store schema-less, and an
    /// unreadable or malformed stored payload leaves the document empty. Both
    /// are reported through `tracing`.
    pub fn new(config: StoreConfig, registry: &BackendRegistry) -> Self {
        let storage_key = config.storage_key();
        let persistence = PersistenceAdapter::new(config.store.as_deref(), storage_key, registry);

        let mut store = Self {
            document: Document::new(),
            schema: None,
            namespace: config.namespace,
            key: config.key,
            persistence,
            auto_commit: config.auto_commit,
            debug: config.debug,
            validate_on_write: config.validate_on_write,
            format: config.format,
            report: ValidationReport::default(),
            last_commit: None,
        };

        if let Some(source) = &config.schema {
            match Schema::load(source) {
                Ok(schema) => store.schema = Some(schema),
                Err(e) => {
                    tracing::warn!(
                        key = store.persistence.key(),
                        error = %e,
                        "Failed to load settings schema, validation disabled"
                    );
                }
            }
        }

        store.document = store.load();
        store
    }

    /// A store with default options and no backend.
    pub fn in_memory() -> Self {
        Self::new(StoreConfig::default(), &BackendRegistry::new())
    }

    fn load(&self) -> Document {
        match self.persistence.load() {
            Ok(LoadOutcome::Loaded(document)) => {
                self.trace("Settings loaded from backend");
                document
            }
            Ok(LoadOutcome::Missing) => {
                self.trace("No stored settings, starting empty");
                Document::new()
            }
            Ok(LoadOutcome::Detached) => Document::new(),
            Err(e) => {
                tracing::warn!(
                    backend = self.persistence.backend_name().unwrap_or_default(),
                    key = self.persistence.key(),
                    error = %e,
                    "Failed to load settings, using an empty document"
                );
                Document::new()
            }
        }
    }

    /// Lifecycle diagnostics; raised to `info` in debug mode.
    fn trace(&self, message: &str) {
        if self.debug {
            tracing::info!(key = self.persistence.key(), "{}", message);
        } else {
            tracing::debug!(key = self.persistence.key(), "{}", message);
        }
    }

    /// Returns the whole document in the configured output format.
    pub fn get_all(&self) -> Output {
        Output::render(&self.document, self.format)
    }

    /// Returns the value at `path`, or `None` when it is absent or the path
    /// is malformed.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = PathExpression::parse(path).ok()?;
        path::get(&self.document, &path)
    }

    /// Returns the value at `path`, or `default` when absent. Stored falsy
    /// values (`false`, `0`, `""`) are returned as stored.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        self.get(path).cloned().unwrap_or_else(|| default.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Writes `value` at `path` through the merge rules, then validates and
    /// auto-commits as configured. Malformed paths are logged and ignored.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.set_with(path, value, false)
    }

    /// Like [`set`](Self::set), optionally skipping validation for this write.
    pub fn set_with(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        bypass_validation: bool,
    ) -> &mut Self {
        if let Some(e) = self.try_write(path, value.into(), bypass_validation).err() {
            tracing::warn!(path, error = %e, "Ignoring rejected settings write");
        }
        self
    }

    /// Like [`set_with`](Self::set_with), but reports rejected writes.
    ///
    /// # Errors
    /// Returns `WriteError::Path` when `path` is empty or has an empty
    /// segment, and `WriteError::Value` when a document value holds a key no
    /// dot-path can reach. The document is left untouched in both cases.
    pub fn try_set(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        bypass_validation: bool,
    ) -> Result<&mut Self, WriteError> {
        self.try_write(path, value.into(), bypass_validation)?;
        Ok(self)
    }

    /// Deep-extends the whole document with `document`. Rejected documents
    /// are logged and ignored.
    pub fn extend(&mut self, document: Document) -> &mut Self {
        if let Some(e) = self.try_extend(document).err() {
            tracing::warn!(error = %e, "Ignoring rejected settings document");
        }
        self
    }

    /// Deep-extends the whole document with `document`, splitting dotted keys
    /// into nested mappings first.
    ///
    /// # Errors
    /// Returns `WriteError::Value` when `document` holds an empty key or a
    /// key with an empty segment; the document is left untouched.
    pub fn try_extend(&mut self, document: Document) -> Result<&mut Self, WriteError> {
        let document = path::expand_keys(document)?;
        merge::deep_extend(&mut self.document, document);
        self.after_write(false);
        Ok(self)
    }

    fn try_write(
        &mut self,
        path: &str,
        value: Value,
        bypass_validation: bool,
    ) -> Result<(), WriteError> {
        let parsed = PathExpression::parse(path)?;
        let value = match value {
            Value::Document(document) => Value::Document(path::expand_keys(document)?),
            other => other,
        };
        path::merge_at(&mut self.document, &parsed, value);
        self.after_write(bypass_validation);
        Ok(())
    }

    fn after_write(&mut self, bypass_validation: bool) {
        if !bypass_validation && self.validate_on_write && self.schema.is_some() {
            self.run_validation();
        }

        if self.report.is_valid() && self.auto_commit {
            self.commit();
        }
    }

    /// Re-runs validation against the current document.
    pub fn validate(&mut self) -> &ValidationReport {
        self.run_validation();
        &self.report
    }

    fn run_validation(&mut self) {
        let Some(schema) = &self.schema else {
            self.report = ValidationReport::default();
            return;
        };

        self.report = schema.validate(&self.document);
        if self.report.is_valid() {
            self.trace("The settings document validates against the schema");
        } else {
            tracing::warn!(
                key = self.persistence.key(),
                violations = self.report.violations().len(),
                "Settings document does not validate"
            );
            for violation in self.report.violations() {
                tracing::warn!(
                    property = %violation.property,
                    message = %violation.message,
                    "Schema violation"
                );
            }
        }
    }

    /// Installs or removes the schema and revalidates.
    pub fn set_schema(&mut self, schema: Option<Schema>) -> &mut Self {
        self.schema = schema;
        self.run_validation();
        self
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    pub fn violations(&self) -> &[Violation] {
        self.report.violations()
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Persists the document, logging any failure. See
    /// [`last_commit`](Self::last_commit) for the outcome.
    pub fn commit(&mut self) -> &mut Self {
        let status = match self.try_commit() {
            Ok(CommitOutcome::Written) => CommitStatus::Written,
            Ok(CommitOutcome::Skipped) => CommitStatus::Skipped,
            Err(e) => {
                tracing::warn!(
                    backend = self.persistence.backend_name().unwrap_or_default(),
                    key = self.persistence.key(),
                    error = %e,
                    "Failed to commit settings"
                );
                CommitStatus::Failed
            }
        };
        self.last_commit = Some(status);
        self
    }

    /// Persists the document and returns the explicit outcome.
    ///
    /// # Errors
    /// Returns `PersistenceError` when serialization or the backend write fails.
    pub fn try_commit(&self) -> Result<CommitOutcome, PersistenceError> {
        let outcome = self.persistence.commit(&self.document)?;
        if outcome == CommitOutcome::Written {
            self.trace("Settings committed");
        }
        Ok(outcome)
    }

    pub fn last_commit(&self) -> Option<CommitStatus> {
        self.last_commit
    }

    /// Renders the document in `format` for handoff to another layer.
    pub fn export(&self, format: OutputFormat) -> Output {
        Output::render(&self.document, format)
    }

    /// Builds a downloadable export with filename and content-type metadata.
    pub fn export_file(&self, options: &ExportOptions) -> Export {
        Export::build(&self.document, options)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key handed to the backend (namespace-qualified).
    pub fn storage_key(&self) -> &str {
        self.persistence.key()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.persistence.backend_name()
    }

    /// True when a backend is bound and commits reach storage.
    pub fn is_persistent(&self) -> bool {
        self.persistence.is_attached()
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PathError, ValueError};
    use crate::persistence::MemoryBackend;
    use serde_json::json;

    fn backed(memory: &MemoryBackend, config: StoreConfig) -> SettingsStore {
        let registry = BackendRegistry::new().with("options", memory.clone());
        SettingsStore::new(config.with_store("options").with_key("site"), &registry)
    }

    fn port_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": { "port": { "type": "number" } }
        })
    }

    #[test]
    fn test_defaults_are_in_memory_and_valid() {
        let store = SettingsStore::in_memory();
        assert!(store.document().is_empty());
        assert!(store.is_valid());
        assert!(!store.is_persistent());
        assert!(!store.auto_commit());
        assert_eq!(store.namespace(), "");
        assert_eq!(store.key(), "");
        assert_eq!(store.format(), OutputFormat::Raw);
    }

    #[test]
    fn test_set_then_get_nested() {
        let mut store = SettingsStore::in_memory();
        store.set("server.host", "localhost").set("server.port", 8080);
        assert_eq!(store.get("server.host"), Some(&Value::from("localhost")));
        assert_eq!(store.get("server.port"), Some(&Value::from(8080)));
        assert_eq!(store.get("server.missing"), None);
    }

    #[test]
    fn test_malformed_paths_are_ignored_or_reported() {
        let mut store = SettingsStore::in_memory();
        store.set("a..b", 1);
        assert!(store.document().is_empty());
        assert!(matches!(
            store.try_set("", 1, false),
            Err(WriteError::Path(PathError::Empty))
        ));
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn test_get_or_keeps_falsy_values() {
        let mut store = SettingsStore::in_memory();
        store.set("flag", false).set("count", 0).set("label", "");
        assert_eq!(store.get_or("flag", "fallback"), Value::from(false));
        assert_eq!(store.get_or("count", "fallback"), Value::from(0));
        assert_eq!(store.get_or("label", "fallback"), Value::from(""));
        assert_eq!(store.get_or("no.such.path", "fallback"), Value::from("fallback"));
    }

    #[test]
    fn test_nested_path_writes_merge_at_the_slot() {
        let mut store = SettingsStore::in_memory();
        store.set("app.tags", vec!["a"]).set("app.tags", vec!["b", "a"]);
        assert_eq!(store.get("app.tags"), Some(&Value::from(vec!["a", "b"])));
    }

    #[test]
    fn test_extend_deep_merges_root() {
        let mut store = SettingsStore::in_memory();
        store.set("server.host", "localhost");
        store.extend(
            Document::new()
                .with("server", Document::new().with("port", 8080))
                .with("debug", true),
        );
        assert_eq!(store.get("server.host"), Some(&Value::from("localhost")));
        assert_eq!(store.get("server.port"), Some(&Value::from(8080)));
        assert_eq!(store.get("debug"), Some(&Value::from(true)));
    }

    #[test]
    fn test_extend_splits_dotted_keys() {
        let mut store = SettingsStore::in_memory();
        store.set("server.host", "localhost");
        store.extend(Document::new().with("a.b", 1).with("server.port", 8080));
        assert_eq!(store.get("a.b"), Some(&Value::from(1)));
        assert_eq!(store.get("server.port"), Some(&Value::from(8080)));
        assert_eq!(store.get("server.host"), Some(&Value::from("localhost")));
        assert!(!store.document().contains_key("a.b"));
    }

    #[test]
    fn test_extend_rejects_empty_key_untouched() {
        let mut store = SettingsStore::in_memory();
        store.set("kept", true);
        let result = store
            .try_extend(Document::new().with("", 1).with("other", 2))
            .map(|_| ());
        assert!(matches!(
            result,
            Err(WriteError::Value(ValueError::UnaddressableKey { .. }))
        ));

        store.extend(Document::new().with("", 1));
        assert_eq!(store.document(), &Document::new().with("kept", true));
    }

    #[test]
    fn test_set_document_value_splits_dotted_keys() {
        let mut store = SettingsStore::in_memory();
        store.set("server", Document::new().with("tls.enabled", true));
        assert_eq!(store.get("server.tls.enabled"), Some(&Value::from(true)));

        let result = store
            .try_set("server", Document::new().with("x..y", 1), false)
            .map(|_| ());
        assert!(matches!(result, Err(WriteError::Value(_))));
        assert_eq!(store.get("server.x"), None);
    }

    #[test]
    fn test_get_all_uses_configured_format() {
        let config = StoreConfig::new().with_format(OutputFormat::Json);
        let mut store = SettingsStore::new(config, &BackendRegistry::new());
        store.set("a", 1);
        assert_eq!(store.get_all(), Output::Json(r#"{"a":1}"#.to_string()));
        assert_eq!(
            store.export(OutputFormat::Object),
            Output::Object(json!({"a": 1}))
        );
    }

    #[test]
    fn test_auto_commit_writes_each_valid_set() {
        let memory = MemoryBackend::new();
        let mut store = backed(&memory, StoreConfig::new().with_auto_commit(true));
        store.set("a", 1);
        assert_eq!(memory.get_text("site").as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(store.last_commit(), Some(CommitStatus::Written));
    }

    #[test]
    fn test_without_auto_commit_nothing_is_written_until_commit() {
        let memory = MemoryBackend::new();
        let mut store = backed(&memory, StoreConfig::new());
        store.set("a", 1);
        assert!(memory.is_empty());
        store.commit();
        assert_eq!(memory.get_text("site").as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_invalid_write_blocks_auto_commit() {
        let memory = MemoryBackend::new();
        let config = StoreConfig::new()
            .with_auto_commit(true)
            .with_schema(port_schema());
        let mut store = backed(&memory, config);

        store.set("port", "notanumber");

        assert!(!store.is_valid());
        assert_eq!(store.violations()[0].property, "/port");
        assert!(memory.is_empty());
        assert_eq!(store.last_commit(), None);

        store.set("port", 8080);
        assert!(store.is_valid());
        assert_eq!(memory.get_text("site").as_deref(), Some(r#"{"port":8080}"#));
    }

    #[test]
    fn test_bypass_validation_keeps_previous_flag() {
        let mut store = SettingsStore::new(
            StoreConfig::new().with_schema(port_schema()),
            &BackendRegistry::new(),
        );
        store.set_with("port", "notanumber", true);
        assert!(store.is_valid());
        assert!(!store.validate().is_valid());
    }

    #[test]
    fn test_validate_on_write_can_be_disabled() {
        let mut store = SettingsStore::new(
            StoreConfig::new()
                .with_schema(port_schema())
                .with_validate_on_write(false),
            &BackendRegistry::new(),
        );
        store.set("port", "notanumber");
        assert!(store.is_valid());
    }

    #[test]
    fn test_unloadable_schema_fails_open() {
        let mut store = SettingsStore::new(
            StoreConfig::new().with_schema(std::path::PathBuf::from("/no/such/schema.json")),
            &BackendRegistry::new(),
        );
        assert!(store.schema().is_none());
        store.set("port", "notanumber");
        assert!(store.is_valid());
    }

    #[test]
    fn test_set_schema_revalidates_existing_document() {
        let mut store = SettingsStore::in_memory();
        store.set("port", "notanumber");
        store.set_schema(Some(Schema::from_value(port_schema()).unwrap()));
        assert!(!store.is_valid());
        store.set_schema(None);
        assert!(store.is_valid());
    }

    #[test]
    fn test_malformed_payload_loads_empty() {
        let memory = MemoryBackend::new();
        memory.insert_text("site", "{ definitely not json");
        let store = backed(&memory, StoreConfig::new());
        assert!(store.document().is_empty());
        assert!(store.is_persistent());
    }

    #[test]
    fn test_stored_dotted_keys_load_nested() {
        let memory = MemoryBackend::new();
        memory.insert_text("site", r#"{"server.port":8080}"#);
        let store = backed(&memory, StoreConfig::new());
        assert_eq!(store.get("server.port"), Some(&Value::from(8080)));

        let legacy = MemoryBackend::new();
        legacy.insert_native("site", json!({"server.port": 8080, "server": {"host": "db"}}));
        let store = backed(&legacy, StoreConfig::new());
        assert_eq!(store.get("server.port"), Some(&Value::from(8080)));
        assert_eq!(store.get("server.host"), Some(&Value::from("db")));
    }

    #[test]
    fn test_stored_empty_key_loads_empty() {
        let memory = MemoryBackend::new();
        memory.insert_text("site", r#"{"": 1, "a": 2}"#);
        let store = backed(&memory, StoreConfig::new());
        assert!(store.document().is_empty());
    }

    #[test]
    fn test_namespace_scopes_storage_key() {
        let memory = MemoryBackend::new();
        let mut store = backed(&memory, StoreConfig::new().with_namespace("app"));
        assert_eq!(store.storage_key(), "app.site");
        store.set("a", 1).commit();
        assert!(memory.contains("app.site"));
        assert!(!memory.contains("site"));
    }

    #[test]
    fn test_unknown_backend_commit_is_skipped() {
        let mut store = SettingsStore::new(
            StoreConfig::new().with_store("nope").with_key("site"),
            &BackendRegistry::new(),
        );
        store.set("a", 1).commit();
        assert_eq!(store.last_commit(), Some(CommitStatus::Skipped));
        assert_eq!(store.try_commit().unwrap(), CommitOutcome::Skipped);
    }
}
