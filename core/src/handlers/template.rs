use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use super::{merge_fields, path_token, segment, Api, PreparedCall};
use crate::descriptor::{check_option, LANGUAGES};
use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::mappers::{map_form_inputs, map_metadata, map_template_variables};
use crate::operation::OperationRequest;
use crate::params::Parameters;

const DEFAULT_LIMIT: i64 = 50;
const DEFAULT_LANG: &str = "pt-br";

fn template_url(api: &Api, token: &str) -> String {
    api.url(&format!("/api/v1/templates/{}/", segment(token)))
}

fn template_token(params: &Parameters) -> Result<String, ZapSignError> {
    path_token(params, "templateToken", "Template Token")
}

/// Hyphenated 8-4-4-4-12 hex.
fn looks_like_uuid(token: &str) -> bool {
    token.len() == 36 && Uuid::try_parse(token).is_ok()
}

pub(super) fn get_all(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let limit = request
        .parameters
        .number("limit")
        .map(|n| n as i64)
        .unwrap_or(DEFAULT_LIMIT)
        .max(1);
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Get, api.url("/api/v1/templates"))
            .with_query("limit", limit.to_string()),
    ))
}

pub(super) fn create_document(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = params.required(
        "templateToken",
        "Template Token is required for template document creation",
    )?;
    if !looks_like_uuid(&token) {
        warn!(
            template_token = %token,
            "template token does not look like xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
        );
    }
    let signer_name = params.required(
        "signer_name",
        "Signer name is required for template document creation",
    )?;

    let mut body = Map::new();
    body.insert("template_id".to_string(), Value::String(token.clone()));
    if let Some(name) = params.non_empty("name") {
        body.insert("name".to_string(), Value::String(name));
    }
    body.insert("signer_name".to_string(), Value::String(signer_name.clone()));
    for key in [
        "signer_email",
        "signer_phone_country",
        "signer_phone_number",
        "brand_logo",
        "brand_primary_color",
        "brand_name",
        "external_id",
        "created_by",
        "folder_token",
    ] {
        if let Some(value) = params.non_empty(key) {
            body.insert(key.to_string(), Value::String(value));
        }
    }
    if let Some(lang) = params.non_empty("lang") {
        check_option("language", &lang, LANGUAGES)?;
        if lang != DEFAULT_LANG {
            body.insert("lang".to_string(), Value::String(lang));
        }
    }
    if let Some(folder) = params.non_empty("folder_path").filter(|f| f != "/") {
        body.insert("folder_path".to_string(), Value::String(folder));
    }
    for key in [
        "disable_signer_emails",
        "disable_signers_get_original_file",
        "send_automatic_whatsapp",
        "send_automatic_whatsapp_signed_file",
        "signature_order_active",
    ] {
        if params.bool_or(key, false) {
            body.insert(key.to_string(), Value::Bool(true));
        }
    }
    let data = map_template_variables(&params.collection("templateData", "variable"));
    if !data.is_empty() {
        body.insert("data".to_string(), Value::Array(data));
    }
    let metadata = map_metadata(&params.collection("metadata", "metadata"));
    if !metadata.is_empty() {
        body.insert("metadata".to_string(), Value::Array(metadata));
    }

    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/models/create-doc/"))
            .with_json(Value::Object(body)),
    )
    .with_detail("Template Token", token)
    .with_detail("Signer Name", signer_name))
}

pub(super) fn create_docx(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let name = params.required("name", "Template name is required.")?;
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(name));
    if params.string_or("docxSource", "url") == "url" {
        let url = params.required("docxUrl", "DOCX URL is required when the source is URL.")?;
        body.insert("docx_url".to_string(), Value::String(url));
    } else {
        let content = params.required(
            "docxBase64",
            "DOCX Base64 is required when the source is Base64.",
        )?;
        body.insert("base64_docx".to_string(), Value::String(content));
    }
    merge_fields(&mut body, params.object("templateAdditionalFields"));
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/templates/create/"))
            .with_json(Value::Object(body)),
    ))
}

pub(super) fn get(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let token = template_token(&request.parameters)?;
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Get, template_url(api, &token)),
    ))
}

pub(super) fn update(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = template_token(params)?;
    let mut body = Map::new();
    if let Some(name) = params.non_empty("name") {
        body.insert("name".to_string(), Value::String(name));
    }
    merge_fields(&mut body, params.object("templateAdditionalFields"));
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Put, template_url(api, &token)).with_json(Value::Object(body)),
    ))
}

pub(super) fn delete(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let token = template_token(&request.parameters)?;
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Delete, template_url(api, &token)),
    ))
}

pub(super) fn update_form(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = template_token(params)?;
    let mut body = Map::new();
    body.insert("template_id".to_string(), Value::String(token));
    let inputs = map_form_inputs(&params.collection("templateFormInputs", "input"));
    if !inputs.is_empty() {
        body.insert("inputs".to_string(), Value::Array(inputs));
    }
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/templates/update-form/"))
            .with_json(Value::Object(body)),
    ))
}
