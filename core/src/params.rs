//! Read-only access to the parameters collected for one input item.
//!
//! Values arrive loosely typed: numbers may be strings, booleans may be
//! `"true"`, and repeatable groups arrive either as `{"signer": [..]}` or as a
//! bare array. Accessors absorb that and keep "unset" distinct from "false".

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ZapSignError;

/// Uploaded file attached to an input item; `data` is base64.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinaryData {
    pub data: String,
    #[serde(default, alias = "fileName")]
    pub file_name: Option<String>,
    #[serde(default, alias = "mimeType")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: Map<String, Value>,
}

impl From<Map<String, Value>> for Parameters {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl Parameters {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// String value as given (numbers and booleans are rendered).
    pub fn string(&self, name: &str) -> Option<String> {
        self.raw(name).and_then(scalar_to_string)
    }

    /// Trimmed string, `None` when absent or blank.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.string(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn string_or(&self, name: &str, default: &str) -> String {
        self.non_empty(name).unwrap_or_else(|| default.to_string())
    }

    /// Trimmed non-empty string or an `InvalidParameter` carrying `message`.
    pub fn required(&self, name: &str, message: &str) -> Result<String, ZapSignError> {
        self.non_empty(name)
            .ok_or_else(|| ZapSignError::invalid(message))
    }

    /// Tri-state boolean: `None` when unset.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.raw(name).and_then(value_to_bool)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.bool(name).unwrap_or(default)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.raw(name).and_then(value_to_f64)
    }

    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.raw(name).and_then(Value::as_object)
    }

    /// Entries of a repeatable group, accepting `{inner: [..]}`,
    /// `{inner: {..}}` or a bare array.
    pub fn collection(&self, name: &str, inner: &str) -> Vec<Map<String, Value>> {
        let Some(value) = self.raw(name) else {
            return Vec::new();
        };
        let entries = match value {
            Value::Object(map) => map.get(inner).cloned().unwrap_or(Value::Null),
            other => other.clone(),
        };
        match entries {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            Value::Object(map) => vec![map],
            _ => Vec::new(),
        }
    }

    /// Object given either inline or as a JSON string; blank strings count
    /// as unset.
    pub fn json_object(&self, name: &str, message: &str) -> Result<Option<Value>, ZapSignError> {
        match self.raw(name) {
            None => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => serde_json::from_str::<Value>(text)
                .ok()
                .filter(|v| v.is_object() || v.is_array())
                .map(Some)
                .ok_or_else(|| ZapSignError::invalid(message)),
            Some(other) => Ok(Some(other.clone())),
        }
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

pub(crate) fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => Parameters::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn booleans_are_tri_state() {
        let p = params(json!({"a": false, "b": "true", "c": null}));
        assert_eq!(p.bool("a"), Some(false));
        assert_eq!(p.bool("b"), Some(true));
        assert_eq!(p.bool("c"), None);
        assert_eq!(p.bool("missing"), None);
        assert!(p.bool_or("missing", true));
    }

    #[test]
    fn non_empty_trims_and_drops_blanks() {
        let p = params(json!({"a": "  x ", "b": "   ", "n": 3}));
        assert_eq!(p.non_empty("a").as_deref(), Some("x"));
        assert_eq!(p.non_empty("b"), None);
        assert_eq!(p.non_empty("n").as_deref(), Some("3"));
    }

    #[test]
    fn required_reports_message() {
        let p = params(json!({"documentToken": " "}));
        let err = p.required("documentToken", "Document Token is required").unwrap_err();
        assert_eq!(err.to_string(), "Document Token is required");
    }

    #[test]
    fn collection_accepts_wrapped_and_bare_shapes() {
        let wrapped = params(json!({"signers": {"signer": [{"name": "A"}, {"name": "B"}]}}));
        assert_eq!(wrapped.collection("signers", "signer").len(), 2);

        let bare = params(json!({"signers": [{"name": "A"}, "junk"]}));
        assert_eq!(bare.collection("signers", "signer").len(), 1);

        let single = params(json!({"signers": {"signer": {"name": "A"}}}));
        assert_eq!(single.collection("signers", "signer").len(), 1);

        let missing = params(json!({}));
        assert!(missing.collection("signers", "signer").is_empty());
    }

    #[test]
    fn json_object_parses_strings() {
        let p = params(json!({
            "meta": "{\"k\":\"v\"}",
            "blank": " ",
            "bad": "{oops",
            "inline": {"a": 1},
        }));
        assert_eq!(p.json_object("meta", "bad json").unwrap(), Some(json!({"k": "v"})));
        assert_eq!(p.json_object("blank", "bad json").unwrap(), None);
        assert_eq!(p.json_object("inline", "bad json").unwrap(), Some(json!({"a": 1})));
        assert_eq!(p.json_object("bad", "bad json").unwrap_err().to_string(), "bad json");
    }

    #[test]
    fn numbers_accept_strings() {
        let p = params(json!({"page": "2", "size": 9.5}));
        assert_eq!(p.number("page"), Some(2.0));
        assert_eq!(p.number("size"), Some(9.5));
    }

    #[test]
    fn binary_data_accepts_camel_case() {
        let b: BinaryData =
            serde_json::from_value(json!({
                "data": "AA==",
                "fileName": "a.pdf",
                "mimeType": "application/pdf",
            }))
                .unwrap();
        assert_eq!(b.file_name.as_deref(), Some("a.pdf"));
        assert_eq!(b.mime_type.as_deref(), Some("application/pdf"));
    }
}
