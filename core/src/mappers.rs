//! Field mappers: loosely typed UI records to vendor-shaped JSON objects.
//!
//! Mappers borrow their input and build a new map. Optional strings are sent
//! only when they have non-blank content; optional booleans are sent whenever
//! they were set, `false` included, because "explicitly disabled" and "not
//! specified" mean different things to the vendor.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::params::{scalar_to_string, value_to_bool, value_to_f64};

pub const DEFAULT_PHONE_COUNTRY: &str = "55";

const SIGNER_STRING_FIELDS: &[&str] = &[
    "email",
    "phone_number",
    "cpf",
    "qualification",
    "external_id",
    "redirect_link",
    "custom_message",
    "auth_mode",
    "signature_placement",
    "rubrica_placement",
    "selfie_validation_type",
];

const SIGNER_BOOL_FIELDS: &[&str] = &[
    "lock_name",
    "lock_email",
    "lock_phone",
    "require_cpf",
    "validate_cpf",
    "send_automatic_email",
    "send_automatic_whatsapp",
    "send_automatic_whatsapp_signed_file",
    "blank_email",
    "hide_email",
    "blank_phone",
    "require_selfie_photo",
    "require_document_photo",
];

fn trimmed(source: &Map<String, Value>, key: &str) -> Option<String> {
    source
        .get(key)
        .and_then(scalar_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn flag(source: &Map<String, Value>, key: &str) -> Option<bool> {
    source.get(key).and_then(value_to_bool)
}

fn copy_strings(source: &Map<String, Value>, out: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(value) = trimmed(source, key) {
            out.insert((*key).to_string(), Value::String(value));
        }
    }
}

fn copy_flags(source: &Map<String, Value>, out: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(value) = flag(source, key) {
            out.insert((*key).to_string(), Value::Bool(value));
        }
    }
}

/// Map one signer entry to the full signer shape used by document creation.
pub fn map_signer(source: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert(
        "name".to_string(),
        Value::String(trimmed(source, "name").unwrap_or_default()),
    );
    out.insert(
        "phone_country".to_string(),
        Value::String(
            trimmed(source, "phone_country").unwrap_or_else(|| DEFAULT_PHONE_COUNTRY.to_string()),
        ),
    );
    copy_strings(source, &mut out, SIGNER_STRING_FIELDS);
    copy_flags(source, &mut out, SIGNER_BOOL_FIELDS);
    if let Some(order) = source.get("order_group").and_then(value_to_f64) {
        out.insert("order_group".to_string(), json!(order as i64));
    }
    out
}

pub fn map_signers(entries: &[Map<String, Value>]) -> Vec<Value> {
    entries.iter().map(|s| Value::Object(map_signer(s))).collect()
}

/// Reduced signer shape for one-click (consent) documents: no
/// authentication, placement or CPF settings, and nothing locked.
pub fn map_one_click_signer(source: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert(
        "name".to_string(),
        Value::String(trimmed(source, "name").unwrap_or_default()),
    );
    out.insert(
        "phone_country".to_string(),
        Value::String(
            trimmed(source, "phone_country").unwrap_or_else(|| DEFAULT_PHONE_COUNTRY.to_string()),
        ),
    );
    copy_strings(source, &mut out, &["email", "phone_number"]);
    for key in ["lock_name", "lock_email", "lock_phone"] {
        out.insert(key.to_string(), Value::Bool(false));
    }
    out
}

pub fn map_one_click_signers(entries: &[Map<String, Value>]) -> Vec<Value> {
    entries
        .iter()
        .map(|s| Value::Object(map_one_click_signer(s)))
        .collect()
}

/// Template variables `{variableName, variableValue}` to `{de, para}` pairs.
/// Pairs with a blank name or value are dropped.
pub fn map_template_variables(entries: &[Map<String, Value>]) -> Vec<Value> {
    let pairs: Vec<Value> = entries
        .iter()
        .filter_map(|entry| {
            let de = trimmed(entry, "variableName")?;
            let para = trimmed(entry, "variableValue")?;
            Some(json!({ "de": de, "para": para }))
        })
        .collect();
    if pairs.len() < entries.len() {
        warn!(
            dropped = entries.len() - pairs.len(),
            "template variables without both a name and a value were skipped"
        );
    }
    pairs
}

/// Metadata `{key, value}` pairs; incomplete pairs are dropped.
pub fn map_metadata(entries: &[Map<String, Value>]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let key = trimmed(entry, "key")?;
            let value = trimmed(entry, "value")?;
            Some(json!({ "key": key, "value": value }))
        })
        .collect()
}

/// Signature/initials placements for `place-signatures`. Entries without a
/// signer token are dropped.
pub fn map_rubrics(entries: &[Map<String, Value>]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let signer_token = trimmed(entry, "signer_token")?;
            let number = |key: &str, default: f64| {
                entry.get(key).and_then(value_to_f64).unwrap_or(default)
            };
            Some(json!({
                "type": trimmed(entry, "type").unwrap_or_else(|| "signature".to_string()),
                "page": number("page", 0.0) as i64,
                "relative_size_x": number("relative_size_x", 19.55),
                "relative_size_y": number("relative_size_y", 9.42),
                "relative_position_bottom": number("relative_position_bottom", 0.0),
                "relative_position_left": number("relative_position_left", 0.0),
                "signer_token": signer_token,
            }))
        })
        .collect()
}

/// Template form inputs for `update-form`. Entries without a variable name
/// are dropped.
pub fn map_form_inputs(entries: &[Map<String, Value>]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let variable = trimmed(entry, "variable")?;
            let text = |key: &str| {
                entry
                    .get(key)
                    .and_then(scalar_to_string)
                    .unwrap_or_default()
            };
            Some(json!({
                "variable": variable,
                "label": text("label"),
                "help_text": text("help_text"),
                "input_type": trimmed(entry, "input_type").unwrap_or_else(|| "input".to_string()),
                "options": text("options"),
                "required": flag(entry, "required").unwrap_or(false),
                "order": entry.get("order").and_then(value_to_f64).unwrap_or(1.0) as i64,
            }))
        })
        .collect()
}
