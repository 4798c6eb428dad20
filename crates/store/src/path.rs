//! Dot-path addressing over nested documents.
//!
//! Responsibilities:
//! - Parse dot-separated path strings into validated segment lists.
//! - Read values at arbitrary depth with an explicit present/absent signal.
//! - Walk or create intermediate mappings for writes.
//! - Split dotted keys of incoming documents into nested mappings.
//! - Flatten documents to dot-keyed leaves and expand them back.
//!
//! Does NOT handle:
//! - Combining an existing value with a new one (see `merge.rs`).
//! - Validation or persistence side effects of writes (see `store.rs`).
//!
//! Invariants:
//! - A parsed path has at least one segment and no empty segments.
//! - Reads never mutate; writes replace any non-mapping intermediate with an
//!   empty mapping.
//! - Falsy scalars (`false`, `0`, `""`) are present values, never defaults.

use std::fmt;

use crate::error::{PathError, ValueError};
use crate::merge;
use crate::value::{Document, Value};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// A validated, non-empty sequence of key segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    segments: Vec<String>,
}

impl PathExpression {
    /// Splits `path` on the separator.
    ///
    /// # Errors
    /// Returns `PathError::Empty` for `""` and `PathError::EmptySegment` when
    /// two separators are adjacent or the path starts/ends with one.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = path.split(SEPARATOR).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
                position,
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when the path addresses more than one mapping level.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Final segment, the key written by `set`.
    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl std::str::FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns the value at `path`, or `None` when any level is absent or an
/// intermediate value is not a mapping.
pub fn get<'a>(document: &'a Document, path: &PathExpression) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = document.get(first)?;
    for segment in rest {
        current = current.as_document()?.get(segment)?;
    }
    Some(current)
}

/// Returns a clone of the value at `path`, or `default` when it is absent.
pub fn get_or(document: &Document, path: &PathExpression, default: Value) -> Value {
    get(document, path).cloned().unwrap_or(default)
}

pub fn contains(document: &Document, path: &PathExpression) -> bool {
    get(document, path).is_some()
}

/// Assigns `value` at `path`, replacing whatever was there.
pub fn set(document: &mut Document, path: &PathExpression, value: Value) {
    write_at(document, path.segments(), value, |_, incoming| incoming);
}

/// Combines `value` with whatever `path` holds through the merge rules.
pub fn merge_at(document: &mut Document, path: &PathExpression, value: Value) {
    write_at(document, path.segments(), value, merge::merge);
}

/// Walks `segments`, creating empty mappings for missing or non-mapping
/// intermediates, and stores `combine(existing, value)` under the last one.
fn write_at(
    document: &mut Document,
    segments: &[String],
    value: Value,
    combine: fn(Option<Value>, Value) -> Value,
) {
    match segments {
        [] => {}
        [leaf] => {
            let existing = document.remove(leaf);
            document.insert(leaf.clone(), combine(existing, value));
        }
        [head, rest @ ..] => match document.get_mut(head) {
            Some(Value::Document(child)) => write_at(child, rest, value, combine),
            _ => {
                let mut child = Document::new();
                write_at(&mut child, rest, value, combine);
                document.insert(head.clone(), child);
            }
        },
    }
}

/// Rewrites keys containing the separator into nested mappings, at every
/// level, so each value is reachable by its dot-path.
///
/// Keys that meet after splitting are combined through the merge rules.
///
/// # Errors
/// Returns `ValueError::UnaddressableKey` for keys no dot-path can reach:
/// the empty key, or a key with an empty segment such as `"a..b"`.
pub fn expand_keys(document: Document) -> Result<Document, ValueError> {
    expand_under(document, "")
}

fn expand_under(document: Document, parent: &str) -> Result<Document, ValueError> {
    let mut out = Document::new();
    for (key, value) in document {
        let value = match value {
            Value::Document(child) => Value::Document(expand_under(child, &join(parent, &key))?),
            other => other,
        };
        insert_key(&mut out, &key, parent, value)?;
    }
    Ok(out)
}

/// Stores `value` under the possibly dotted `key` of the mapping at `parent`.
pub(crate) fn insert_key(
    document: &mut Document,
    key: &str,
    parent: &str,
    value: Value,
) -> Result<(), ValueError> {
    let path = PathExpression::parse(key).map_err(|_| ValueError::UnaddressableKey {
        key: key.to_string(),
        parent: parent.to_string(),
    })?;
    merge_at(document, &path, value);
    Ok(())
}

/// Appends `key` to the dot-path `parent`.
pub(crate) fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{SEPARATOR}{key}")
    }
}

/// Lists every leaf value with its dot-path, in key order.
///
/// Empty mappings are reported as leaves so that `unflatten` can restore them.
pub fn flatten(document: &Document) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(document, "", &mut out);
    out
}

fn flatten_into(document: &Document, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in document.iter() {
        let path = join(prefix, key);
        match value {
            Value::Document(child) if !child.is_empty() => flatten_into(child, &path, out),
            leaf => out.push((path, leaf.clone())),
        }
    }
}

/// Expands dot-keyed pairs into a nested document.
///
/// Pairs are applied in order through the merge rules, so two keys that share
/// a prefix end up in the same mapping.
///
/// # Errors
/// Returns the first `PathError` among the keys; nothing is built in that case.
pub fn unflatten<I, K>(pairs: I) -> Result<Document, PathError>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut document = Document::new();
    for (key, value) in pairs {
        let path = PathExpression::parse(key.as_ref())?;
        merge_at(&mut document, &path, value);
    }
    Ok(document)
}
