use crate::MappingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered string-keyed mapping used for every document node.
pub type Mapping = serde_json::Map<String, Value>;

/// Strings the engine uses to say "unset".
pub const SENTINELS: [&str; 4] = ["null", "default", ",", "no"];

/// Get-or-absent access over nested JSON values.
pub trait ValueExt {
    /// Walk `path` through nested mappings, `None` as soon as a key is missing
    /// or an intermediate node is not a mapping.
    fn at(&self, path: &[&str]) -> Option<&Value>;

    fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path).and_then(Value::as_str)
    }
}

impl ValueExt for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |node, key| node.as_object()?.get(*key))
    }
}

/// Whether a mapped value deserves a place in the document.
///
/// Null, `false`, zero, empty strings and collections, and the sentinel
/// strings are all rejected.
pub fn is_valid(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty() && !SENTINELS.contains(&s.as_str()),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Remove a single leading `separator`, if present.
pub fn strip_separator(s: &str, separator: char) -> &str {
    s.strip_prefix(separator).unwrap_or(s)
}

/// Inspect payload for a single container, exactly as the engine reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAttributes(Value);

impl RawAttributes {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        self.0.at(path)
    }

    /// Like [`get`](Self::get), but a missing path is a contract violation.
    pub fn require(&self, path: &[&str]) -> Result<&Value, MappingError> {
        self.get(path)
            .ok_or_else(|| MappingError::MissingPath(path.join(".")))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.str_at(&["Id"])
    }

    /// Display name with the engine's leading `/`.
    pub fn name(&self) -> Option<&str> {
        self.0.str_at(&["Name"])
    }
}

impl From<Value> for RawAttributes {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_at_walks_nested_mappings() {
        let value = json!({"HostConfig": {"RestartPolicy": {"Name": "always"}}});

        assert_eq!(
            value.str_at(&["HostConfig", "RestartPolicy", "Name"]),
            Some("always")
        );
        assert!(value.at(&["HostConfig", "Missing"]).is_none());
        assert!(value.at(&["HostConfig", "RestartPolicy", "Name", "Deeper"]).is_none());
    }

    #[test]
    fn test_sentinels_and_empty_values_are_invalid() {
        for invalid in [
            json!(null),
            json!(""),
            json!("null"),
            json!("default"),
            json!(","),
            json!("no"),
            json!([]),
            json!({}),
            json!(false),
            json!(0),
        ] {
            assert!(!is_valid(&invalid), "{invalid} should be rejected");
        }
    }

    #[test]
    fn test_sentinel_match_is_case_sensitive() {
        assert!(is_valid(&json!("No")));
        assert!(is_valid(&json!("DEFAULT")));
        assert!(is_valid(&json!("always")));
        assert!(is_valid(&json!(["a"])));
        assert!(is_valid(&json!(512)));
        assert!(is_valid(&json!(true)));
    }

    #[test]
    fn test_require_names_the_missing_path() {
        let raw = RawAttributes::new(json!({"Config": {}}));

        assert_eq!(
            raw.require(&["HostConfig", "Binds"]),
            Err(MappingError::MissingPath("HostConfig.Binds".to_string()))
        );
    }

    #[test]
    fn test_strip_separator_removes_one_character() {
        assert_eq!(strip_separator("/web", '/'), "web");
        assert_eq!(strip_separator("//web", '/'), "/web");
        assert_eq!(strip_separator(":8080:80", ':'), "8080:80");
        assert_eq!(strip_separator("web", '/'), "web");
    }
}
