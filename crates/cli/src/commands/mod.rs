//! Command handlers, one module per subcommand.

pub mod export;
pub mod get;
pub mod list;
pub mod set;
pub mod validate;

use anyhow::{Context, Result};
use settings_store::Value;

/// Parses a command-line value as JSON, falling back to a plain string.
///
/// JSON that parses but cannot be stored (e.g. `null`, nested arrays) is an
/// error rather than a silent string.
pub(crate) fn parse_value(raw: &str) -> Result<Value> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::try_from(json).with_context(|| format!("Cannot store value '{raw}'")),
        Err(_) => Ok(Value::from(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings_store::Document;

    #[test]
    fn test_parse_value_reads_json_scalars() {
        assert_eq!(parse_value("8080").unwrap(), Value::from(8080));
        assert_eq!(parse_value("false").unwrap(), Value::from(false));
        assert_eq!(parse_value("\"8080\"").unwrap(), Value::from("8080"));
    }

    #[test]
    fn test_parse_value_reads_json_containers() {
        assert_eq!(parse_value(r#"["a","b"]"#).unwrap(), Value::from(vec!["a", "b"]));
        assert_eq!(
            parse_value(r#"{"x":1}"#).unwrap(),
            Value::from(Document::new().with("x", 1))
        );
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("localhost").unwrap(), Value::from("localhost"));
        assert_eq!(parse_value("{ broken").unwrap(), Value::from("{ broken"));
    }

    #[test]
    fn test_parse_value_rejects_null() {
        assert!(parse_value("null").is_err());
    }
}
