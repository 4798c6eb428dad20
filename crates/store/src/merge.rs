//! Type-dispatched merge rules.
//!
//! Responsibilities:
//! - Combine an existing value with an incoming one according to the pair of
//!   variants involved.
//! - Deep-extend mappings and union sequences.
//!
//! Does NOT handle:
//! - Locating the slot being written (see `path.rs`).
//!
//! Invariants:
//! - Mapping merges never drop existing keys the incoming mapping omits.
//! - Sequence unions hold no duplicates; existing elements keep their order
//!   and new elements follow in first-seen order. Numbers are duplicates
//!   when their numeric values are equal.
//! - Every other pairing is a plain overwrite by the incoming value.
//!
//! | existing \ new | Scalar    | Document    | Sequence  |
//! |----------------|-----------|-------------|-----------|
//! | Scalar         | overwrite | overwrite   | overwrite |
//! | Document       | overwrite | deep-extend | overwrite |
//! | Sequence       | overwrite | overwrite   | union     |
//! | absent         | set       | set         | set       |

use crate::value::{Document, Scalar, Value};

/// Merges `incoming` into `existing` and returns the value to store.
pub fn merge(existing: Option<Value>, incoming: Value) -> Value {
    match (existing, incoming) {
        (Some(Value::Document(mut target)), Value::Document(source)) => {
            deep_extend(&mut target, source);
            Value::Document(target)
        }
        (Some(Value::Sequence(current)), Value::Sequence(extra)) => {
            Value::Sequence(union(current, extra))
        }
        (_, incoming) => incoming,
    }
}

/// Recursively merges `source` into `target`.
///
/// Keys present in both are combined with [`merge`], so nested mappings are
/// extended and nested sequences are unioned.
pub fn deep_extend(target: &mut Document, source: Document) {
    for (key, value) in source {
        let existing = target.remove(&key);
        target.insert(key, merge(existing, value));
    }
}

/// Concatenates two sequences and removes duplicates by value equality.
///
/// Numbers compare by numeric value, so `1` and `1.0` are one element and
/// the first occurrence is kept.
pub fn union(existing: Vec<Scalar>, incoming: Vec<Scalar>) -> Vec<Scalar> {
    let mut out: Vec<Scalar> = Vec::with_capacity(existing.len() + incoming.len());
    for item in existing.into_iter().chain(incoming) {
        if !out.iter().any(|kept| same_element(kept, &item)) {
            out.push(item);
        }
    }
    out
}

fn same_element(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        // integers compare exactly; a float on either side compares as f64
        (Scalar::Number(x), Scalar::Number(y)) if x.is_f64() || y.is_f64() => {
            x.as_f64() == y.as_f64()
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, i64)]) -> Document {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_absent_takes_incoming() {
        assert_eq!(merge(None, Value::from(1)), Value::from(1));
        assert_eq!(
            merge(None, Value::from(vec!["a"])),
            Value::from(vec!["a"])
        );
    }

    #[test]
    fn test_scalar_pairs_overwrite() {
        assert_eq!(
            merge(Some(Value::from("old")), Value::from(false)),
            Value::from(false)
        );
        let d = Value::from(doc(&[("x", 1)]));
        assert_eq!(merge(Some(Value::from(1)), d.clone()), d);
        assert_eq!(
            merge(Some(Value::from(1)), Value::from(vec![2])),
            Value::from(vec![2])
        );
    }

    #[test]
    fn test_document_and_sequence_cross_pairs_overwrite() {
        let d = Value::from(doc(&[("x", 1)]));
        let s = Value::from(vec!["a"]);
        assert_eq!(merge(Some(d.clone()), s.clone()), s);
        assert_eq!(merge(Some(s), d.clone()), d);
        assert_eq!(
            merge(Some(d), Value::from("flat")),
            Value::from("flat")
        );
    }

    #[test]
    fn test_documents_deep_extend() {
        let merged = merge(
            Some(Value::from(doc(&[("x", 1), ("y", 1)]))),
            Value::from(doc(&[("y", 2), ("z", 3)])),
        );
        assert_eq!(merged, Value::from(doc(&[("x", 1), ("y", 2), ("z", 3)])));
    }

    #[test]
    fn test_deep_extend_recurses_into_nested_documents_and_sequences() {
        let mut target = Document::new()
            .with("server", Document::new().with("host", "a").with("port", 1))
            .with("tags", vec!["x"]);
        let source = Document::new()
            .with("server", Document::new().with("port", 2))
            .with("tags", vec!["x", "y"]);

        deep_extend(&mut target, source);

        let server = target.get("server").and_then(Value::as_document).unwrap();
        assert_eq!(server.get("host"), Some(&Value::from("a")));
        assert_eq!(server.get("port"), Some(&Value::from(2)));
        assert_eq!(target.get("tags"), Some(&Value::from(vec!["x", "y"])));
    }

    #[test]
    fn test_union_removes_duplicates() {
        let merged = union(
            vec!["a".into(), "b".into()],
            vec!["b".into(), "c".into(), "c".into()],
        );
        assert_eq!(merged, vec![Scalar::from("a"), "b".into(), "c".into()]);
    }

    #[test]
    fn test_union_compares_numbers_by_value() {
        let one_float = Scalar::from_f64(1.0).unwrap();
        let merged = union(
            vec![Scalar::from(1), Scalar::from_f64(2.5).unwrap()],
            vec![one_float.clone(), Scalar::from_f64(2.5).unwrap(), Scalar::from(3)],
        );
        assert_eq!(
            merged,
            vec![Scalar::from(1), Scalar::from_f64(2.5).unwrap(), Scalar::from(3)]
        );

        let merged = union(vec![one_float.clone()], vec![Scalar::from(1u64)]);
        assert_eq!(merged, vec![one_float]);
    }

    #[test]
    fn test_union_distinguishes_types() {
        let merged = union(vec![Scalar::from(1)], vec![Scalar::from("1"), Scalar::from(true)]);
        assert_eq!(merged.len(), 3);
    }
}
