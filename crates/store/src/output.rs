//! Output representations and export payloads.
//!
//! Responsibilities:
//! - Render a document as a raw mapping, JSON text, or a generic JSON value.
//! - Build the export payload (body, suggested filename, content type) handed
//!   to an external transfer layer.
//!
//! Does NOT handle:
//! - Emitting bytes or headers; that belongs to whichever layer consumes
//!   `Export`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value::Document;

/// Representation requested for whole-document reads and exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The document itself.
    #[default]
    #[serde(alias = "array", alias = "hash-map")]
    Raw,
    /// Compact JSON text.
    Json,
    /// A generic `serde_json::Value` tree.
    Object,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "array" | "hash-map" => Ok(OutputFormat::Raw),
            "json" => Ok(OutputFormat::Json),
            "object" => Ok(OutputFormat::Object),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Json => "json",
            OutputFormat::Object => "object",
        })
    }
}

/// A document rendered in one of the output formats.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Raw(Document),
    Json(String),
    Object(serde_json::Value),
}

impl Output {
    /// Renders `document` as `format`.
    pub fn render(document: &Document, format: OutputFormat) -> Self {
        match format {
            OutputFormat::Raw => Output::Raw(document.clone()),
            OutputFormat::Json => Output::Json(to_json(document)),
            OutputFormat::Object => Output::Object(document.clone().into()),
        }
    }

    pub fn as_json(&self) -> Option<&str> {
        match self {
            Output::Json(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_document(self) -> Option<Document> {
        match self {
            Output::Raw(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<serde_json::Value> {
        match self {
            Output::Object(value) => Some(value),
            _ => None,
        }
    }
}

fn to_json(document: &Document) -> String {
    // Document only holds strings, finite numbers, booleans, and string keys.
    serde_json::to_string(document).unwrap_or_else(|_| "{}".to_string())
}

/// Options for an export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Base of the suggested filename.
    pub name: String,
    pub format: OutputFormat,
    pub charset: String,
    /// Overrides the suggested filename entirely.
    pub filename: Option<String>,
    /// Date stamped into the filename; today when unset.
    pub date: Option<NaiveDate>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            name: "settings".to_string(),
            format: OutputFormat::Json,
            charset: "utf8".to_string(),
            filename: None,
            date: None,
        }
    }
}

impl ExportOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }
}

/// Serialized document plus the metadata a transfer layer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub body: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl Export {
    /// Builds an export of `document`. Exports are always JSON text; the
    /// `object` format pretty-prints it.
    pub fn build(document: &Document, options: &ExportOptions) -> Self {
        let body = match options.format {
            OutputFormat::Object => serde_json::to_string_pretty(document)
                .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Raw | OutputFormat::Json => to_json(document),
        };

        let filename = options.filename.clone().unwrap_or_else(|| {
            let date = options
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            format!("{}-{}.json", options.name, date.format("%Y-%m-%d"))
        });

        let content_type = match options.format {
            OutputFormat::Json => format!("application/json; charset={}", options.charset),
            _ => format!("text/plain; charset={}", options.charset),
        };

        Self {
            body: body.into_bytes(),
            filename,
            content_type,
        }
    }
}
