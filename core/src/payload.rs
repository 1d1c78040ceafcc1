//! Successful response bodies and the output accumulator.
//!
//! The vendor answers with an object, an array of objects, or occasionally
//! plain text. `ApiPayload` decodes that once at the boundary so nothing
//! downstream deals with an untyped blob.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    RawText(String),
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl ApiPayload {
    /// Decode a 2xx body. Anything that is not a JSON object or array is
    /// kept as text instead of failing.
    pub fn decode(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => ApiPayload::Object(map),
            Ok(Value::Array(items)) => ApiPayload::Array(items),
            Ok(Value::String(text)) => ApiPayload::RawText(text),
            _ => ApiPayload::RawText(body.to_string()),
        }
    }

    /// True for an empty body or an empty object/array.
    pub fn is_empty(&self) -> bool {
        match self {
            ApiPayload::RawText(text) => text.trim().is_empty(),
            ApiPayload::Object(map) => map.is_empty(),
            ApiPayload::Array(items) => items.is_empty(),
        }
    }

    /// Output records for this payload; arrays flatten into one record per
    /// element.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            ApiPayload::RawText(text) => vec![json!({ "raw": text })],
            ApiPayload::Object(map) => vec![Value::Object(map)],
            ApiPayload::Array(items) => items,
        }
    }
}

/// Ordered, append-only list of output records for one execution pass.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    records: Vec<Value>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_records(&mut self, records: Vec<Value>) {
        self.records.extend(records);
    }

    /// The single record a failed item contributes in continue-on-fail mode.
    pub fn push_error(&mut self, message: &str) {
        self.records.push(json!({ "error": message, "json": {} }));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}
