use serde_json::{Map, Value};

use super::{path_token, segment, Api, PreparedCall};
use crate::descriptor::{check_option, AUTH_MODES, SELFIE_VALIDATION_TYPES};
use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::operation::OperationRequest;
use crate::params::Parameters;

const DEFAULT_AUTH_MODE: &str = "assinaturaTela";

/// Optional string parameters and the body key each one fills.
const OPTIONAL_STRINGS: &[(&str, &str)] = &[
    ("phoneCountry", "phone_country"),
    ("phoneNumber", "phone_number"),
    ("redirectLink", "redirect_link"),
    ("qualification", "qualification"),
    ("externalId", "external_id"),
    ("cpf", "cpf"),
];

fn signer_token(params: &Parameters) -> Result<String, ZapSignError> {
    path_token(params, "signerToken", "Signer Token")
}

fn put_string(body: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::String(value));
    }
}

fn put_bool(body: &mut Map<String, Value>, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::Bool(value));
    }
}

fn selfie_validation(params: &Parameters) -> Result<Option<String>, ZapSignError> {
    let value = params.non_empty("selfieValidationType");
    if let Some(kind) = &value {
        check_option("selfie validation type", kind, SELFIE_VALIDATION_TYPES)?;
    }
    Ok(value)
}

pub(super) fn add(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let document = path_token(params, "signerDocumentToken", "Document Token")?;
    let name = params.required("signerName", "Signer name is required.")?;
    let auth_mode = params
        .string("authMethod")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| DEFAULT_AUTH_MODE.to_string());
    check_option("authentication method", &auth_mode, AUTH_MODES)?;

    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(name));
    put_string(&mut body, "email", params.non_empty("signerEmail"));
    if !auth_mode.is_empty() {
        body.insert("auth_mode".to_string(), Value::String(auth_mode));
    }
    for (param, key) in OPTIONAL_STRINGS {
        put_string(&mut body, key, params.non_empty(param));
    }
    put_string(&mut body, "selfie_validation_type", selfie_validation(params)?);

    body.insert(
        "require_document_photo".to_string(),
        Value::Bool(params.bool_or("requireDocAuth", false)),
    );
    body.insert(
        "require_selfie_photo".to_string(),
        Value::Bool(params.bool_or("requireFacialRecognition", false)),
    );
    // Locks are only ever switched on when adding.
    for (param, key) in [
        ("lockName", "lock_name"),
        ("lockEmail", "lock_email"),
        ("lockPhone", "lock_phone"),
    ] {
        if params.bool_or(param, false) {
            body.insert(key.to_string(), Value::Bool(true));
        }
    }
    for (param, key, default) in [
        ("sendAutomaticEmail", "send_automatic_email", true),
        ("sendAutomaticWhatsapp", "send_automatic_whatsapp", false),
        ("sendAutomaticWhatsappSignedFile", "send_automatic_whatsapp_signed_file", false),
        ("requireCpf", "require_cpf", false),
        ("validateCpf", "validate_cpf", false),
    ] {
        body.insert(key.to_string(), Value::Bool(params.bool_or(param, default)));
    }

    let url = api.url(&format!("/api/v1/docs/{}/add-signer/", segment(&document)));
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, url).with_json(Value::Object(body)),
    ))
}

pub(super) fn remove(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let token = signer_token(&request.parameters)?;
    let url = api.url(&format!("/api/v1/signer/{}/remove/", segment(&token)));
    Ok(PreparedCall::new(request.kind, HttpRequest::new(HttpMethod::Delete, url)))
}

/// Partial update: strings only when non-blank, booleans whenever set.
pub(super) fn update(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let token = signer_token(params)?;

    let mut body = Map::new();
    put_string(&mut body, "name", params.non_empty("signerName"));
    put_string(&mut body, "email", params.non_empty("newSignerEmail"));
    if let Some(auth_mode) = params.non_empty("authMethod") {
        check_option("authentication method", &auth_mode, AUTH_MODES)?;
        body.insert("auth_mode".to_string(), Value::String(auth_mode));
    }
    for (param, key) in OPTIONAL_STRINGS {
        put_string(&mut body, key, params.non_empty(param));
    }
    put_string(&mut body, "selfie_validation_type", selfie_validation(params)?);
    for (param, key) in [
        ("requireDocAuth", "require_document_photo"),
        ("requireFacialRecognition", "require_selfie_photo"),
        ("lockName", "lock_name"),
        ("lockEmail", "lock_email"),
        ("lockPhone", "lock_phone"),
        ("sendAutomaticEmail", "send_automatic_email"),
        ("sendAutomaticWhatsapp", "send_automatic_whatsapp"),
        ("sendAutomaticWhatsappSignedFile", "send_automatic_whatsapp_signed_file"),
        ("requireCpf", "require_cpf"),
        ("validateCpf", "validate_cpf"),
    ] {
        put_bool(&mut body, key, params.bool(param));
    }

    let url = api.url(&format!("/api/v1/signers/{}/", segment(&token)));
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, url).with_json(Value::Object(body)),
    ))
}

pub(super) fn get(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let token = signer_token(&request.parameters)?;
    let url = api.url(&format!("/api/v1/signers/{}/", segment(&token)));
    Ok(PreparedCall::new(request.kind, HttpRequest::new(HttpMethod::Get, url)))
}

pub(super) fn reset_attempts(
    api: &Api,
    request: &OperationRequest,
) -> Result<PreparedCall, ZapSignError> {
    let token = request.parameters.required(
        "signerToken",
        "Signer Token is required for resetting validation attempts.",
    )?;
    let url = api.url(&format!("/api/v1/reset-auth-attempts/{}", segment(&token)));
    Ok(PreparedCall::new(request.kind, HttpRequest::new(HttpMethod::Put, url))
        .with_detail("Signer Token", token))
}
